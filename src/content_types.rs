//! MCP content types and return value normalization
//!
//! Tool, prompt and resource implementations return a `HandlerOutput`. Before
//! it goes on the wire the dispatcher flattens it into an ordered list of
//! `ContentEntry` values with `normalize`.
//!
//! ```rust
//! use lambdamcp::content_types::{normalize, HandlerOutput, ToolResult};
//!
//! let output = HandlerOutput::from(vec![
//!     HandlerOutput::from("first"),
//!     ToolResult::text("second").into(),
//! ]);
//! assert_eq!(normalize(output).len(), 2);
//! ```

use {
    base64::{engine::general_purpose::STANDARD, Engine},
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// A single content item as sent to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    /// Plain text content
    Text { text: String },

    /// Image content (base64 encoded)
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },

    /// Error description attached to failed calls
    Error { text: String },

    /// Embedded resource content
    Resource { resource: ResourceContent },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    /// Build image content from raw bytes, sniffing the mime type.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::image(STANDARD.encode(bytes), sniff_mime_type(bytes))
    }
}

/// Contents of a resource as returned by `resources/read`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Role of a prompt message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A role-tagged message produced by a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: ContentItem,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentItem::text(text),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: ContentItem::text(text),
        }
    }
}

/// Result of a tool call: display content plus optional structured data
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    pub structured_content: Option<Value>,
}

impl ToolResult {
    pub fn new(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            structured_content: None,
        }
    }

    /// Create a simple text result
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentItem::text(text)])
    }

    /// Text for display together with machine-readable data
    pub fn with_text_and_data(text: impl Into<String>, data: Value) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            structured_content: Some(data),
        }
    }
}

/// Everything an implementation may hand back to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    Text(String),
    /// Plain JSON value, stringified for the wire
    Value(Value),
    ToolResult(ToolResult),
    Message(PromptMessage),
    /// Binary payload, sent as an image content item
    Bytes(Vec<u8>),
    List(Vec<HandlerOutput>),
}

impl HandlerOutput {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }
}

impl From<String> for HandlerOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HandlerOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ToolResult> for HandlerOutput {
    fn from(result: ToolResult) -> Self {
        Self::ToolResult(result)
    }
}

impl From<PromptMessage> for HandlerOutput {
    fn from(message: PromptMessage) -> Self {
        Self::Message(message)
    }
}

impl From<Vec<HandlerOutput>> for HandlerOutput {
    fn from(items: Vec<HandlerOutput>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<PromptMessage>> for HandlerOutput {
    fn from(messages: Vec<PromptMessage>) -> Self {
        Self::List(messages.into_iter().map(Self::Message).collect())
    }
}

/// A normalized wire entry: either a content item or a whole prompt message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Message(PromptMessage),
    Content(ContentItem),
}

/// Flatten a handler's return value into wire entries. Never fails.
pub fn normalize(output: HandlerOutput) -> Vec<ContentEntry> {
    let mut entries = Vec::new();
    normalize_into(output, &mut entries);
    entries
}

fn normalize_into(output: HandlerOutput, entries: &mut Vec<ContentEntry>) {
    match output {
        HandlerOutput::List(items) => {
            for item in items {
                normalize_into(item, entries);
            }
        }
        // only the first content element of a tool result is forwarded
        HandlerOutput::ToolResult(result) => {
            if let Some(first) = result.content.into_iter().next() {
                entries.push(ContentEntry::Content(first));
            }
        }
        HandlerOutput::Message(message) => entries.push(ContentEntry::Message(message)),
        HandlerOutput::Bytes(bytes) => {
            entries.push(ContentEntry::Content(ContentItem::from_bytes(&bytes)))
        }
        HandlerOutput::Text(text) => entries.push(ContentEntry::Content(ContentItem::text(text))),
        HandlerOutput::Value(value) => {
            entries.push(ContentEntry::Content(ContentItem::text(stringify(value))))
        }
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Classify binary data by its leading magic bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(PNG_MAGIC) {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}
