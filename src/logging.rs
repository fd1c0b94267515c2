//! MCP Debug Logging Module
//!
//! Structured logging for the MCP handler using the tracing crate.
//! Includes request IDs, session lifecycle events and implementation timings.

use {
    std::sync::atomic::{AtomicU64, Ordering},
    std::time::{Duration, SystemTime, UNIX_EPOCH},
    tracing::{debug, error, info, span, warn, Level, Span},
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

const DEFAULT_FILTER: &str = "lambdamcp=info,warp=info";

/// Initialize the tracing subscriber with appropriate configuration.
///
/// `RUST_LOG` selects levels and `LOG_FORMAT=json` switches to structured
/// output. Calling this more than once is harmless: later calls are ignored.
pub fn init_tracing() {
    // Try to get log level from environment, default to info
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let initialized = if json_format {
        // JSON format for production/structured logging
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        // Human-readable format for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    if initialized.is_ok() {
        info!(json = json_format, "Tracing initialized");
    }
}

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique request ID for tracking
pub fn generate_request_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{:x}-{:04x}", timestamp, counter % 0x10000)
}

/// Create a span for tracking a request
pub fn request_span(http_method: &str, trace_id: &str, session_id: Option<&str>) -> Span {
    span!(
        Level::INFO,
        "mcp_request",
        http_method = %http_method,
        trace_id = %trace_id,
        session_id = session_id,
    )
}

pub fn log_request_received(method: &str, id: Option<&serde_json::Value>, body_size: usize) {
    debug!(
        method = %method,
        message_id = ?id,
        body_size = body_size,
        event = "request_received",
        "Received JSON-RPC request"
    );
}

pub fn log_request_rejected(reason: &str) {
    warn!(
        reason = %reason,
        event = "request_rejected",
        "Rejected request before dispatch"
    );
}

/// Session lifecycle
pub fn log_session_created(session_id: &str) {
    info!(
        session_id = %session_id,
        event = "session_created",
        "Session created"
    );
}

pub fn log_session_deleted(session_id: &str, existed: bool) {
    info!(
        session_id = %session_id,
        existed = existed,
        event = "session_deleted",
        "Session deletion requested"
    );
}

pub fn log_session_rejected(session_id: Option<&str>) {
    warn!(
        session_id = session_id,
        event = "session_rejected",
        "Missing or unknown session"
    );
}

/// Log tool events
pub fn log_tool_call(tool: &str, args: &serde_json::Map<String, serde_json::Value>) {
    info!(
        tool = %tool,
        args = ?args,
        event = "tool_call",
        "Tool call requested"
    );
}

pub fn log_unknown_tool(tool: &str) {
    warn!(
        tool = %tool,
        event = "unknown_tool",
        "Unknown tool requested"
    );
}

pub fn log_unknown_method(method: &str) {
    warn!(
        method = %method,
        event = "unknown_method",
        "Unknown MCP method requested"
    );
}

pub fn log_handler_success(method: &str, target: &str, duration: Duration) {
    info!(
        method = %method,
        target = %target,
        duration_ms = duration.as_millis(),
        event = "handler_success",
        "Successfully handled method"
    );
}

pub fn log_handler_error(method: &str, target: &str, error: &str, duration: Duration) {
    error!(
        method = %method,
        target = %target,
        error = %error,
        duration_ms = duration.as_millis(),
        event = "handler_error",
        "Implementation failed"
    );
}

pub fn log_internal_error(error: &str, session_id: Option<&str>) {
    error!(
        error = %error,
        session_id = session_id,
        event = "internal_error",
        "Unhandled failure while processing request"
    );
}

/// Server lifecycle logging
pub fn log_server_startup(name: &str, version: &str, addr: &str) {
    info!(
        name = %name,
        version = %version,
        address = %addr,
        event = "server_startup",
        "Starting MCP Server"
    );
}

pub fn log_server_ready(addr: &str) {
    info!(
        address = %addr,
        event = "server_ready",
        "MCP Server ready and listening"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_distinct() {
        let first = generate_request_id();
        let second = generate_request_id();
        assert_ne!(first, second);
        assert!(first.contains('-'));
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
