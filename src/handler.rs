//! Request dispatcher
//!
//! `McpHandler` turns one HTTP-carried JSON-RPC event into one HTTP response.
//! It owns the session lifecycle for the duration of the request and routes
//! each method to the registry. Nothing a registered implementation does can
//! escape as a transport failure: errors and panics are converted to JSON-RPC
//! errors at the call site, and anything else is caught at the top level.

use {
    crate::{
        content_types::normalize,
        error::{McpError, McpResult},
        framework::{RequestContext, Registry},
        http::{extract_session_id, is_json_content_type, HttpEvent, HttpResponse, ResponseBuilder},
        logging::{
            generate_request_id, log_handler_error, log_handler_success, log_internal_error,
            log_request_received, log_request_rejected, log_session_created, log_session_deleted,
            log_session_rejected, log_tool_call, log_unknown_method, log_unknown_tool, request_span,
        },
        protocol::{JsonRpcRequest, ParsedMessage, PromptGetParams, ResourceReadParams, ToolCallParams},
        session::SessionStore,
        types::InitializeResult,
    },
    anyhow::anyhow,
    futures_util::FutureExt,
    serde_json::{json, Value},
    std::{any::Any, future::Future, panic::AssertUnwindSafe, sync::Arc, time::Instant},
    tracing::{debug, Instrument},
};

const REDACTED_MESSAGE: &str = "Internal server error";

/// What has been resolved about the request so far; used to shape both
/// regular responses and the top-level failure response.
struct RequestState {
    request_id: Option<Value>,
    context: RequestContext,
    /// Set once the bound session id was found in the store or issued by
    /// `initialize`. Only a resolved id is echoed back.
    session_resolved: bool,
}

impl RequestState {
    fn resolved_session(&self) -> Option<&str> {
        if self.session_resolved {
            self.context.session_id()
        } else {
            None
        }
    }
}

/// MCP request handler bound to a registry and a session store
pub struct McpHandler {
    name: String,
    version: String,
    store: Arc<dyn SessionStore>,
    registry: Registry,
    redact_internal_errors: bool,
}

impl McpHandler {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        store: Arc<dyn SessionStore>,
        registry: Registry,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            store,
            registry,
            redact_internal_errors: false,
        }
    }

    /// Replace the message of top-level failures with a generic text
    pub fn with_redacted_errors(mut self, redact: bool) -> Self {
        self.redact_internal_errors = redact;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handle one HTTP event. Always produces a response.
    pub async fn handle_request(&self, event: HttpEvent) -> HttpResponse {
        let trace_id = generate_request_id();
        let headers = event.normalized_headers();
        let session_id = extract_session_id(&headers);
        let span = request_span(&event.http_method, &trace_id, session_id.as_deref());

        // The context lives only as long as this call, so the session binding
        // is dropped on every exit path.
        let mut state = RequestState {
            request_id: None,
            context: RequestContext::new(session_id, self.store.clone()),
            session_resolved: false,
        };

        let content_type = headers.get("content-type").map(String::as_str);
        let outcome = AssertUnwindSafe(self.dispatch(&event, content_type, &mut state))
            .catch_unwind()
            .instrument(span)
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => self.internal_failure(&format!("{err:#}"), &state),
            Err(panic) => self.internal_failure(&panic_message(panic.as_ref()), &state),
        }
    }

    /// Handle an event given as API Gateway proxy JSON, returning the
    /// response in the same shape.
    pub async fn handle_event_json(&self, raw_event: &str) -> String {
        let response = match serde_json::from_str::<HttpEvent>(raw_event) {
            Ok(event) => self.handle_request(event).await,
            Err(err) => {
                log_request_rejected(&format!("malformed event: {err}"));
                ResponseBuilder::new().build_error(&McpError::Parse, None)
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|_| r#"{"statusCode":500}"#.to_string())
    }

    async fn dispatch(
        &self,
        event: &HttpEvent,
        content_type: Option<&str>,
        state: &mut RequestState,
    ) -> anyhow::Result<HttpResponse> {
        if event.is_delete() {
            if let Some(session_id) = state.context.session_id() {
                let deleted = self.store.delete(session_id).await?;
                log_session_deleted(session_id, deleted);
                return Ok(HttpResponse::status(if deleted { 204 } else { 404 }));
            }
        }

        if !is_json_content_type(content_type) {
            log_request_rejected("unsupported media type");
            return Ok(self.error_response(&McpError::UnsupportedMediaType, state));
        }

        let Some(body) = event.decoded_body() else {
            log_request_rejected("missing body");
            return Ok(self.error_response(&McpError::Parse, state));
        };

        let request = match JsonRpcRequest::parse(&body) {
            Ok(request) => request,
            Err(envelope_error) => {
                state.request_id = envelope_error.id;
                log_request_rejected("malformed JSON-RPC envelope");
                return Ok(self.error_response(&McpError::Parse, state));
            }
        };
        state.request_id = request.id.clone();
        log_request_received(&request.method, request.id.as_ref(), body.len());

        if request.method != "initialize" {
            if let Some(err) = self.check_session(&state.context).await? {
                log_session_rejected(state.context.session_id());
                return Ok(self.error_response(&err, state));
            }
            // A stateless store never verifies ids, so a client-supplied one
            // stays unresolved.
            state.session_resolved = !self.store.is_stateless();
        }

        let message = match request.parse_params() {
            Ok(message) => message,
            Err(err) => {
                if let McpError::UnknownMethod(method) = &err {
                    log_unknown_method(method);
                }
                return Ok(self.error_response(&err, state));
            }
        };

        let result = match message {
            ParsedMessage::Initialize => {
                let session_id = self.store.create().await?;
                log_session_created(&session_id);
                state.context.bind_session(session_id);
                state.session_resolved = true;
                Ok(serde_json::to_value(InitializeResult::new(&self.name, &self.version))?)
            }
            ParsedMessage::Ping => Ok(json!({})),
            ParsedMessage::ToolsList => Ok(json!({ "tools": self.registry.list_tools() })),
            ParsedMessage::PromptsList => Ok(json!({ "prompts": self.registry.list_prompts() })),
            ParsedMessage::ResourcesList => {
                Ok(json!({ "resources": self.registry.list_resources() }))
            }
            ParsedMessage::ToolsCall(params) => self.call_tool(params, &state.context).await,
            ParsedMessage::PromptsGet(params) => self.get_prompt(params, &state.context).await,
            ParsedMessage::ResourcesRead(params) => self.read_resource(params).await,
        };

        Ok(match result {
            Ok(value) => ResponseBuilder::new()
                .with_session(state.resolved_session())
                .build_success(state.request_id.clone(), value),
            Err(err) => self.error_response(&err, state),
        })
    }

    /// `None` when the request may proceed, otherwise the session error to
    /// report. A stateless store accepts every request and ignores any id.
    async fn check_session(&self, context: &RequestContext) -> anyhow::Result<Option<McpError>> {
        if self.store.is_stateless() {
            return Ok(None);
        }
        Ok(match context.session_id() {
            Some(session_id) => match self.store.get(session_id).await? {
                Some(_) => None,
                None => Some(McpError::InvalidSession),
            },
            None => Some(McpError::SessionRequired),
        })
    }

    async fn call_tool(&self, params: ToolCallParams, context: &RequestContext) -> McpResult<Value> {
        let Some(tool) = self.registry.tool(&params.name) else {
            log_unknown_tool(&params.name);
            return Err(McpError::UnknownTool(params.name));
        };

        log_tool_call(&params.name, &params.arguments);
        let started = Instant::now();
        match guarded(tool.call(params.arguments, context.clone())).await {
            Ok(output) => {
                log_handler_success("tools/call", &params.name, started.elapsed());
                Ok(json!({ "content": normalize(output) }))
            }
            Err(err) => {
                let message = format!("{err:#}");
                log_handler_error("tools/call", &params.name, &message, started.elapsed());
                Err(McpError::ToolExecution(message))
            }
        }
    }

    async fn get_prompt(&self, params: PromptGetParams, context: &RequestContext) -> McpResult<Value> {
        let Some(prompt) = self.registry.prompt(&params.name) else {
            return Err(McpError::UnknownPrompt(params.name));
        };

        let started = Instant::now();
        match guarded(prompt.call(params.arguments, context.clone())).await {
            Ok(output) => {
                log_handler_success("prompts/get", &params.name, started.elapsed());
                Ok(json!({ "messages": normalize(output) }))
            }
            Err(err) => {
                let message = format!("{err:#}");
                log_handler_error("prompts/get", &params.name, &message, started.elapsed());
                Err(McpError::PromptExecution(message))
            }
        }
    }

    async fn read_resource(&self, params: ResourceReadParams) -> McpResult<Value> {
        let Some(resource) = self.registry.resource(&params.uri) else {
            return Err(McpError::UnknownResource(params.uri));
        };

        let started = Instant::now();
        match guarded(resource.read()).await {
            Ok(content) => {
                log_handler_success("resources/read", &params.uri, started.elapsed());
                Ok(json!({ "contents": [content] }))
            }
            Err(err) => {
                let message = format!("{err:#}");
                log_handler_error("resources/read", &params.uri, &message, started.elapsed());
                Err(McpError::ResourceRead(message))
            }
        }
    }

    fn error_response(&self, err: &McpError, state: &RequestState) -> HttpResponse {
        debug!(code = err.error_code(), error = %err, "Responding with JSON-RPC error");
        ResponseBuilder::new()
            .with_session(state.resolved_session())
            .build_error(err, state.request_id.clone())
    }

    fn internal_failure(&self, message: &str, state: &RequestState) -> HttpResponse {
        log_internal_error(message, state.context.session_id());
        let message = if self.redact_internal_errors {
            REDACTED_MESSAGE.to_string()
        } else {
            message.to_string()
        };
        ResponseBuilder::new()
            .with_session(state.resolved_session())
            .with_status(500)
            .build_error(&McpError::Internal(message), state.request_id.clone())
    }
}

impl std::fmt::Debug for McpHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpHandler")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("stateless", &self.store.is_stateless())
            .field("tools", &self.registry.tool_count())
            .field("prompts", &self.registry.prompt_count())
            .field("resources", &self.registry.resource_count())
            .finish()
    }
}

/// Run an implementation future, turning a panic into an ordinary error
async fn guarded<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(anyhow!(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "implementation panicked".to_string()
    }
}
