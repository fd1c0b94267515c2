//! JSON-RPC message processing
//!
//! Envelope parsing for inbound requests, method routing into typed
//! parameter structs, and the response envelope.

use {
    crate::{
        content_types::ContentItem,
        error::{McpError, McpResult},
    },
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

pub const JSONRPC_VERSION: &str = "2.0";

/// Validated JSON-RPC request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

/// Why a body could not be turned into a request. `id` carries whatever
/// request id could be recovered from the raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeError {
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Parse and validate an HTTP body.
    ///
    /// Fails when the body is not JSON, not an object, does not declare
    /// `jsonrpc: "2.0"`, has no string `method`, or carries non-object params.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(body).map_err(|_| EnvelopeError { id: None })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut object) = value else {
            return Err(EnvelopeError { id: None });
        };
        let id = object.get("id").cloned().filter(|id| !id.is_null());
        let invalid = || EnvelopeError { id: id.clone() };

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(invalid());
        }
        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(invalid()),
        };
        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(Value::Object(params)) => Some(params),
            Some(_) => return Err(invalid()),
        };

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method,
            params,
        })
    }

    fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(name))
    }

    fn string_param(&self, name: &str) -> McpResult<Option<String>> {
        match self.param(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(McpError::InvalidParams(format!("'{name}' must be a string"))),
        }
    }

    /// A non-empty string parameter
    fn required_str(&self, name: &str) -> McpResult<String> {
        self.string_param(name)?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| McpError::MissingParam(name.to_string()))
    }

    /// Tool or prompt name. An empty name is kept and fails the lookup.
    fn lookup_name(&self) -> McpResult<String> {
        self.string_param("name")?
            .ok_or_else(|| McpError::MissingParam("name".to_string()))
    }

    fn arguments(&self) -> McpResult<Map<String, Value>> {
        match self.param("arguments") {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(arguments)) => Ok(arguments.clone()),
            Some(_) => Err(McpError::InvalidParams("'arguments' must be an object".into())),
        }
    }

    /// Route the method to its typed parameters
    pub fn parse_params(&self) -> McpResult<ParsedMessage> {
        match self.method.as_str() {
            "initialize" => Ok(ParsedMessage::Initialize),
            "ping" => Ok(ParsedMessage::Ping),
            "tools/list" => Ok(ParsedMessage::ToolsList),
            "tools/call" => Ok(ParsedMessage::ToolsCall(ToolCallParams {
                name: self.lookup_name()?,
                arguments: self.arguments()?,
            })),
            "prompts/list" => Ok(ParsedMessage::PromptsList),
            "prompts/get" => Ok(ParsedMessage::PromptsGet(PromptGetParams {
                name: self.lookup_name()?,
                arguments: self.arguments()?,
            })),
            "resources/list" => Ok(ParsedMessage::ResourcesList),
            "resources/read" => Ok(ParsedMessage::ResourcesRead(ResourceReadParams {
                uri: self.required_str("uri")?,
            })),
            other => Err(McpError::UnknownMethod(other.to_string())),
        }
    }
}

/// Parsed and routed MCP request
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    Initialize,
    Ping,
    ToolsList,
    ToolsCall(ToolCallParams),
    PromptsList,
    PromptsGet(PromptGetParams),
    ResourcesList,
    ResourcesRead(ResourceReadParams),
}

/// Tool call parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// Prompt get parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PromptGetParams {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// Resource read parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Response envelope: exactly one of `result` / `error` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Structured error content accompanying handler failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_content: Option<Vec<ContentItem>>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
            error_content: None,
        }
    }

    pub fn failure(
        id: Option<Value>,
        code: i32,
        message: impl Into<String>,
        error_content: Option<Vec<ContentItem>>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
            error_content,
        }
    }
}
