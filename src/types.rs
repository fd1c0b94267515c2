//! Core types for the MCP protocol
//!
//! Descriptors advertised by the list methods and the `initialize` result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version reported by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Value of the `MCP-Version` response header
pub const MCP_VERSION_HEADER: &str = "0.6";

/// Definition of a tool that can be called
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON Schema defining the tool's input parameters
    pub input_schema: Value,
}

/// Definition of a prompt template. Prompts advertise their parameters the
/// same way tools do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Information about a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// The URI of the resource
    pub uri: String,
    /// The name of the resource
    pub name: String,
    /// A description of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The MIME type of the resource
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsCapability {
    pub list: bool,
    pub call: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesCapability {
    pub list: bool,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptsCapability {
    pub list: bool,
    pub get: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tools: ToolsCapability,
    pub resources: ResourcesCapability,
    pub prompts: PromptsCapability,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            tools: ToolsCapability { list: true, call: true },
            resources: ResourcesCapability { list: true, read: true },
            prompts: PromptsCapability { list: true, get: true },
        }
    }
}

/// Result of the `initialize` method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    pub capabilities: Capabilities,
}

impl InitializeResult {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            capabilities: Capabilities::default(),
        }
    }
}
