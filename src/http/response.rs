//! HTTP Response Building
//!
//! Functions for building HTTP responses with proper headers and formatting.

use {
    super::event::HttpResponse,
    crate::{
        content_types::ContentItem,
        error::McpError,
        protocol::JsonRpcResponse,
        types::MCP_VERSION_HEADER,
    },
    serde_json::Value,
    std::collections::BTreeMap,
    tracing::debug,
};

pub const SESSION_HEADER: &str = "MCP-Session-Id";

/// Builder for JSON-RPC carrying HTTP responses
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    session_id: Option<String>,
    status_override: Option<u16>,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo a session id in the `MCP-Session-Id` header
    pub fn with_session(mut self, session_id: Option<&str>) -> Self {
        self.session_id = session_id.map(str::to_string);
        self
    }

    /// Force the HTTP status instead of deriving it from the error code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_override = Some(status);
        self
    }

    fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("MCP-Version".to_string(), MCP_VERSION_HEADER.to_string());
        if let Some(session_id) = &self.session_id {
            headers.insert(SESSION_HEADER.to_string(), session_id.clone());
        }
        headers
    }

    fn build(self, status: u16, envelope: &JsonRpcResponse) -> HttpResponse {
        let body = serde_json::to_string(envelope).unwrap_or_else(|_| "{}".to_string());
        debug!(
            status = status,
            has_session = self.session_id.is_some(),
            body_size = body.len(),
            "Built response"
        );
        HttpResponse {
            status_code: self.status_override.unwrap_or(status),
            headers: self.headers(),
            body: Some(body),
        }
    }

    /// Build a success response
    pub fn build_success(self, id: Option<Value>, result: Value) -> HttpResponse {
        self.build(200, &JsonRpcResponse::success(id, result))
    }

    /// Build an error response. Implementation failures also carry their
    /// message as an error content item.
    pub fn build_error(self, error: &McpError, id: Option<Value>) -> HttpResponse {
        let error_content = error
            .execution_detail()
            .map(|detail| vec![ContentItem::error(detail)]);
        let envelope =
            JsonRpcResponse::failure(id, error.error_code(), error.to_string(), error_content);
        self.build(error.http_status(), &envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_builder_basic() {
        let response = ResponseBuilder::new().build_success(Some(json!(1)), json!({}));

        assert_eq!(response.status_code, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("mcp-version"), Some("0.6"));
        assert_eq!(response.header("mcp-session-id"), None);
        assert_eq!(response.body.as_deref(), Some(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
    }

    #[test]
    fn test_response_builder_with_session() {
        let response = ResponseBuilder::new()
            .with_session(Some("test123"))
            .build_success(None, json!({}));

        assert_eq!(response.header("MCP-Session-Id"), Some("test123"));
    }

    #[test]
    fn test_response_builder_error() {
        let response = ResponseBuilder::new().build_error(&McpError::UnknownTool("x".into()), Some(json!(3)));
        assert_eq!(response.status_code, 404);

        let body = response.json_body().unwrap();
        assert_eq!(body["id"], 3);
        assert_eq!(body["error"]["code"], -32601);
        assert!(body.get("result").is_none());
        assert!(body.get("errorContent").is_none());
    }

    #[test]
    fn test_execution_error_carries_content() {
        let response = ResponseBuilder::new().build_error(&McpError::ToolExecution("boom".into()), None);
        assert_eq!(response.status_code, 500);

        let body = response.json_body().unwrap();
        assert_eq!(body["error"]["message"], "Error executing tool: boom");
        assert_eq!(body["errorContent"], json!([{"type": "error", "text": "boom"}]));
    }

    #[test]
    fn test_status_override() {
        let response = ResponseBuilder::new()
            .with_status(503)
            .build_error(&McpError::Internal("down".into()), None);
        assert_eq!(response.status_code, 503);
    }
}
