//! JSON-RPC protocol layer
//!
//! Request envelopes, method routing and response envelopes.

pub mod message;

pub use message::{
    EnvelopeError, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ParsedMessage,
    PromptGetParams, ResourceReadParams, ToolCallParams, JSONRPC_VERSION,
};
