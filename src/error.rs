use thiserror::Error;

/// JSON-RPC error codes used on the wire
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const SERVER_ERROR: i32 = -32000;
}

#[derive(Debug, Error)]
pub enum McpError {
    // Transport / parse errors
    #[error("Unsupported Media Type")]
    UnsupportedMediaType,

    #[error("Parse error")]
    Parse,

    // Parameter errors
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    // Lookup errors
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Prompt '{0}' not found")]
    UnknownPrompt(String),

    #[error("Resource not found: {0}")]
    UnknownResource(String),

    // Failures raised by registered implementations
    #[error("Error executing tool: {0}")]
    ToolExecution(String),

    #[error("Error executing prompt: {0}")]
    PromptExecution(String),

    #[error("Error reading resource: {0}")]
    ResourceRead(String),

    // Session errors
    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Session required")]
    SessionRequired,

    // Anything else that escaped the dispatcher
    #[error("{0}")]
    Internal(String),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            Self::UnsupportedMediaType | Self::Parse => codes::PARSE_ERROR,
            Self::InvalidParams(_) | Self::MissingParam(_) => codes::INVALID_PARAMS,
            Self::UnknownMethod(_)
            | Self::UnknownTool(_)
            | Self::UnknownPrompt(_)
            | Self::UnknownResource(_) => codes::METHOD_NOT_FOUND,
            Self::ToolExecution(_) | Self::PromptExecution(_) | Self::ResourceRead(_) => {
                codes::INTERNAL_ERROR
            }
            Self::InvalidSession | Self::SessionRequired | Self::Internal(_) => codes::SERVER_ERROR,
        }
    }

    /// HTTP status for this error. Session errors override the code table.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidSession => 404,
            Self::SessionRequired => 400,
            _ => status_for_code(self.error_code()),
        }
    }

    /// The underlying failure message of an implementation error, used for
    /// the accompanying error content item.
    pub fn execution_detail(&self) -> Option<&str> {
        match self {
            Self::ToolExecution(msg) | Self::PromptExecution(msg) | Self::ResourceRead(msg) => {
                Some(msg)
            }
            _ => None,
        }
    }
}

/// Map a JSON-RPC error code onto an HTTP status code.
pub fn status_for_code(code: i32) -> u16 {
    match code {
        codes::PARSE_ERROR | codes::INVALID_REQUEST | codes::INVALID_PARAMS => 400,
        codes::METHOD_NOT_FOUND => 404,
        codes::INTERNAL_ERROR => 500,
        _ => 500,
    }
}

// Result type alias for convenience
pub type McpResult<T> = Result<T, McpError>;
