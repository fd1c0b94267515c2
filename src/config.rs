//! Server configuration
//!
//! Loaded from environment variables, the way serverless deployments pass
//! settings to a function.

use {
    crate::session::{InMemorySessionStore, NoOpSessionStore, SessionStore},
    serde::{Deserialize, Serialize},
    std::{env, sync::Arc},
    thiserror::Error,
};

pub const ENV_SERVER_NAME: &str = "MCP_SERVER_NAME";
pub const ENV_SERVER_VERSION: &str = "MCP_SERVER_VERSION";
pub const ENV_HOST: &str = "MCP_HOST";
pub const ENV_PORT: &str = "MCP_PORT";
pub const ENV_SESSION_STORE: &str = "MCP_SESSION_STORE";
pub const ENV_REDACT_ERRORS: &str = "MCP_REDACT_ERRORS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Which session store backs the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// Stateless: requests without a session id are accepted
    None,
    #[default]
    Memory,
}

impl SessionStoreKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "noop" | "stateless" => Some(Self::None),
            "memory" | "in-memory" | "inmemory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub session_store: SessionStoreKind,
    /// Hide messages of uncaught internal failures from clients
    pub redact_internal_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "lambdamcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_store: SessionStoreKind::default(),
            redact_internal_errors: false,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_SERVER_NAME) {
            config.name = name;
        }
        if let Some(version) = lookup(ENV_SERVER_VERSION) {
            config.version = version;
        }
        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_PORT,
                message: format!("'{port}' is not a valid port"),
            })?;
        }
        if let Some(kind) = lookup(ENV_SESSION_STORE) {
            config.session_store =
                SessionStoreKind::parse(&kind).ok_or_else(|| ConfigError::InvalidValue {
                    field: ENV_SESSION_STORE,
                    message: format!("unknown session store '{kind}', expected none or memory"),
                })?;
        }
        if let Some(flag) = lookup(ENV_REDACT_ERRORS) {
            config.redact_internal_errors = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidValue {
                field: ENV_REDACT_ERRORS,
                message: format!("'{flag}' is not a boolean"),
            })?;
        }

        Ok(config)
    }

    /// Socket address string for the HTTP transport
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the configured session store
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        match self.session_store {
            SessionStoreKind::None => Arc::new(NoOpSessionStore),
            SessionStoreKind::Memory => Arc::new(InMemorySessionStore::new()),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
