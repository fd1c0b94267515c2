//! HTTP Transport Module
//!
//! Event and response shapes, header validation and response building for
//! the HTTP-carried JSON-RPC protocol.

pub mod event;
pub mod response;
pub mod validation;

// Re-export commonly used types
pub use event::{HttpEvent, HttpResponse};
pub use response::{ResponseBuilder, SESSION_HEADER};
pub use validation::{extract_session_id, is_json_content_type, SESSION_HEADER_KEY};
