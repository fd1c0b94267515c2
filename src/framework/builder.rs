//! Fluent builder for `McpHandler`.

use {
    super::{
        context::{Arguments, RequestContext},
        registry::{Registry, Resource, Signature},
    },
    crate::{
        config::ServerConfig,
        content_types::HandlerOutput,
        handler::McpHandler,
        session::{NoOpSessionStore, SessionStore},
    },
    anyhow::Result,
    std::{future::Future, sync::Arc},
};

/// Convenience builder for creating handlers with minimal boilerplate.
///
/// Without an explicit store the handler runs stateless (`NoOpSessionStore`).
pub struct McpHandlerBuilder {
    name: String,
    version: String,
    store: Arc<dyn SessionStore>,
    registry: Registry,
    redact_internal_errors: bool,
}

impl McpHandlerBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            store: Arc::new(NoOpSessionStore),
            registry: Registry::new(),
            redact_internal_errors: false,
        }
    }

    /// Start from a loaded configuration: server identity, session store and
    /// error redaction.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.name.clone(), config.version.clone())
            .with_session_store(config.session_store())
            .with_redacted_errors(config.redact_internal_errors)
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace messages of uncaught internal failures with a generic text
    pub fn with_redacted_errors(mut self, redact: bool) -> Self {
        self.redact_internal_errors = redact;
        self
    }

    pub fn with_tool<F, Fut, O>(mut self, signature: Signature, handler: F) -> Self
    where
        F: Fn(Arguments, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        O: Into<HandlerOutput>,
    {
        self.registry.register_tool(signature, handler);
        self
    }

    pub fn with_prompt<F, Fut, O>(mut self, signature: Signature, handler: F) -> Self
    where
        F: Fn(Arguments, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        O: Into<HandlerOutput>,
    {
        self.registry.register_prompt(signature, handler);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.registry.add_resource(resource);
        self
    }

    /// Mutable access for registrations done in a loop or helper function
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn build(self) -> McpHandler {
        McpHandler::new(self.name, self.version, self.store, self.registry)
            .with_redacted_errors(self.redact_internal_errors)
    }
}
