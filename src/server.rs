//! HTTP server
//!
//! Serves an `McpHandler` over warp: `/mcp` accepts GET, POST and DELETE and
//! is translated to and from the handler's event shape, and `/health` answers
//! liveness checks.

use {
    crate::{
        handler::McpHandler,
        http::{HttpEvent, HttpResponse},
        logging::{log_server_ready, log_server_startup},
    },
    anyhow::{Context, Result},
    std::{collections::HashMap, convert::Infallible, net::SocketAddr, sync::Arc},
    tokio::net::TcpListener,
    tokio_stream::wrappers::TcpListenerStream,
    tracing::debug,
    warp::{
        http::{header::HeaderName, HeaderMap, HeaderValue, Method, StatusCode},
        hyper::body::Bytes,
        Filter, Rejection, Reply,
    },
};

pub struct McpServer {
    handler: Arc<McpHandler>,
}

impl McpServer {
    pub fn new(handler: McpHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &Arc<McpHandler> {
        &self.handler
    }

    /// All routes served by this server
    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let health_route = warp::path!("health")
            .and(warp::get())
            .map(|| warp::reply::with_status("OK", StatusCode::OK));

        mcp_route(self.handler.clone()).or(health_route)
    }

    /// Bind to `addr` and serve until the process stops
    pub async fn start(&self, addr: &str) -> Result<()> {
        let addr = addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid address: {addr}"))?;

        log_server_startup(self.handler.name(), self.handler.version(), &addr.to_string());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Could not bind to {}: {}", addr, e))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr().context("Listener has no local address")?;
        log_server_ready(&format!("http://{local_addr}/mcp"));

        warp::serve(self.routes())
            .run_incoming(TcpListenerStream::new(listener))
            .await;

        Ok(())
    }
}

fn with_handler(
    handler: Arc<McpHandler>,
) -> impl Filter<Extract = (Arc<McpHandler>,), Error = Infallible> + Clone {
    warp::any().map(move || handler.clone())
}

fn mcp_route(
    handler: Arc<McpHandler>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone {
    let methods = warp::get().or(warp::post()).unify().or(warp::delete()).unify();

    warp::path!("mcp")
        .and(methods)
        .and(warp::method())
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .and(with_handler(handler))
        .and_then(handle_mcp)
}

async fn handle_mcp(
    method: Method,
    headers: HeaderMap,
    body: Bytes,
    handler: Arc<McpHandler>,
) -> Result<warp::reply::Response, Infallible> {
    let event = HttpEvent {
        http_method: method.as_str().to_string(),
        headers: event_headers(&headers),
        body: into_body(body),
        is_base64_encoded: false,
    };
    debug!(method = %event.http_method, "Forwarding HTTP request to handler");

    let response = handler.handle_request(event).await;
    Ok(into_reply(response))
}

/// Request body as text; empty or non UTF-8 bodies count as absent
fn into_body(bytes: Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    String::from_utf8(bytes.to_vec()).ok()
}

fn event_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

fn into_reply(response: HttpResponse) -> warp::reply::Response {
    let mut reply = warp::reply::Response::new(response.body.unwrap_or_default().into());
    *reply.status_mut() =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    for (name, value) in response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            reply.headers_mut().insert(name, value);
        }
    }
    reply
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            framework::{McpHandlerBuilder, Signature},
            session::InMemorySessionStore,
        },
        serde_json::{json, Value},
        warp::test::request,
    };

    fn server() -> McpServer {
        let handler = McpHandlerBuilder::new("warp-test", "0.1.0")
            .with_session_store(Arc::new(InMemorySessionStore::new()))
            .with_tool(Signature::new("echo").param::<String>("text"), |args, _ctx| async move {
                args.require::<String>("text")
            })
            .build();
        McpServer::new(handler)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = server();
        let resp = request().method("GET").path("/health").reply(&server.routes()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), "OK");
    }

    #[tokio::test]
    async fn test_initialize_then_call_over_warp() {
        let server = server();
        let routes = server.routes();

        let resp = request()
            .method("POST")
            .path("/mcp")
            .header("content-type", "application/json")
            .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}))
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["mcp-version"], "0.6");
        let session_id = resp.headers()["mcp-session-id"].to_str().unwrap().to_string();

        let resp = request()
            .method("POST")
            .path("/mcp")
            .header("content-type", "application/json")
            .header("mcp-session-id", &session_id)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "echo", "arguments": {"text": "hi"}}
            }))
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["result"]["content"], json!([{"type": "text", "text": "hi"}]));

        let resp = request()
            .method("DELETE")
            .path("/mcp")
            .header("mcp-session-id", &session_id)
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), 204);
        assert!(resp.body().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_content_type_over_warp() {
        let server = server();
        let resp = request()
            .method("POST")
            .path("/mcp")
            .header("content-type", "text/plain")
            .body("hello")
            .reply(&server.routes())
            .await;
        assert_eq!(resp.status(), 400);
        let body: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_rejected() {
        let server = server();
        let resp = request().method("PUT").path("/mcp").reply(&server.routes()).await;
        assert!(resp.status().is_client_error());
    }
}
