//! HTTP Request Validation
//!
//! Header checks performed before the body is looked at.

use std::collections::HashMap;

/// Lowercased name of the session header
pub const SESSION_HEADER_KEY: &str = "mcp-session-id";

/// Whether the content type names `application/json`. Media type parameters
/// such as `charset` are ignored.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Session id from already-lowercased headers; blank values count as absent
pub fn extract_session_id(headers: &HashMap<String, String>) -> Option<String> {
    headers
        .get(SESSION_HEADER_KEY)
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
