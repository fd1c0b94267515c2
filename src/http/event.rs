//! HTTP event and response shapes
//!
//! Modelled on the API Gateway proxy integration: the serverless runtime
//! hands the function an event with method, headers and body, and expects a
//! response with status code, headers and optional body.

use {
    base64::{engine::general_purpose::STANDARD, Engine},
    serde::{Deserialize, Deserializer, Serialize},
    std::collections::{BTreeMap, HashMap},
};

/// Inbound HTTP request as delivered to the handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HttpEvent {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// JSON POST with an optional session header
    pub fn json_post(body: impl Into<String>, session_id: Option<&str>) -> Self {
        let event = Self::new("POST")
            .with_header("Content-Type", "application/json")
            .with_body(body);
        match session_id {
            Some(id) => event.with_header("Mcp-Session-Id", id),
            None => event,
        }
    }

    /// Header map with lowercased names
    pub fn normalized_headers(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect()
    }

    pub fn is_delete(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("DELETE")
    }

    /// Body text, base64-decoded when the event says so. `None` when there is
    /// no body or it cannot be decoded as UTF-8.
    pub fn decoded_body(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        if !self.is_base64_encoded {
            return Some(body.clone());
        }
        let bytes = STANDARD.decode(body).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Outbound HTTP response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl HttpResponse {
    /// Bare status response without headers or body
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parse the body as JSON
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_api_gateway_json() {
        let raw = r#"{
            "httpMethod": "POST",
            "headers": {"Content-Type": "application/json", "MCP-Session-Id": "abc"},
            "body": "{\"jsonrpc\":\"2.0\"}",
            "isBase64Encoded": false,
            "requestContext": {"stage": "prod"}
        }"#;
        let event: HttpEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.http_method, "POST");

        let headers = event.normalized_headers();
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
        assert_eq!(headers.get("mcp-session-id").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_null_headers_and_body() {
        let event: HttpEvent = serde_json::from_str(r#"{"httpMethod":"GET","headers":null,"body":null}"#).unwrap();
        assert!(event.headers.is_empty());
        assert_eq!(event.decoded_body(), None);
    }

    #[test]
    fn test_base64_body() {
        let event = HttpEvent {
            body: Some(STANDARD.encode("{\"a\":1}")),
            is_base64_encoded: true,
            ..HttpEvent::new("POST")
        };
        assert_eq!(event.decoded_body().as_deref(), Some("{\"a\":1}"));

        let broken = HttpEvent {
            body: Some("***".into()),
            is_base64_encoded: true,
            ..HttpEvent::new("POST")
        };
        assert_eq!(broken.decoded_body(), None);
    }

    #[test]
    fn test_bare_status_response_serialization() {
        let json = serde_json::to_string(&HttpResponse::status(204)).unwrap();
        assert_eq!(json, r#"{"statusCode":204}"#);
    }
}
