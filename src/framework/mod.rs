//! Registration framework for MCP handlers.
//!
//! Tools, prompts and resources are declared explicitly at startup with
//! `Signature` and `Resource` and stored in a `Registry`. The fluent
//! `McpHandlerBuilder` wraps all of it together with the session store.
//!
//! # Quick Start
//!
//! ```rust
//! use lambdamcp::{
//!     content_types::ToolResult,
//!     framework::{McpHandlerBuilder, Resource, Signature},
//!     session::InMemorySessionStore,
//! };
//! use std::sync::Arc;
//!
//! let handler = McpHandlerBuilder::new("notes", "1.0.0")
//!     .with_session_store(Arc::new(InMemorySessionStore::new()))
//!     .with_tool(
//!         Signature::new("echo").description("Echo a message").param::<String>("message"),
//!         |args, _ctx| async move {
//!             let message: String = args.require("message")?;
//!             Ok(ToolResult::text(message))
//!         },
//!     )
//!     .with_resource(Resource::text("notes://about", "about", "Demo notebook"))
//!     .build();
//!
//! assert_eq!(handler.registry().tool_count(), 1);
//! ```

pub mod builder;
pub mod context;
pub mod registry;

pub use builder::McpHandlerBuilder;
pub use context::{Arguments, RequestContext};
pub use registry::{Registry, Resource, Signature};
