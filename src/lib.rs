//! MCP (Model Context Protocol) handler library for serverless HTTP
//!
//! A request-in, response-out implementation of the Model Context Protocol:
//! each HTTP event carrying a JSON-RPC message is dispatched to explicitly
//! registered tools, prompts and resources, with sessions kept in a
//! pluggable store. A warp server is included for running outside a
//! serverless runtime.

pub mod config;
pub mod content_types;
pub mod error;
pub mod framework;
pub mod handler;
pub mod http;
pub mod logging;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod session;
pub mod types;

// Test modules
#[cfg(test)]
mod tests;

// Re-export key types
pub use config::ServerConfig;
pub use content_types::{ContentItem, HandlerOutput, PromptMessage, ResourceContent, Role, ToolResult};
pub use error::{McpError, McpResult};
pub use framework::{Arguments, McpHandlerBuilder, RequestContext, Resource, Signature};
pub use handler::McpHandler;
pub use http::{HttpEvent, HttpResponse};
pub use schema::{EnumType, InputSchema, ParamType, SchemaType};
pub use server::McpServer;
pub use session::{InMemorySessionStore, NoOpSessionStore, SessionData, SessionStore};
