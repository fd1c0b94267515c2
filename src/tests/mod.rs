//! MCP Handler Tests
//!
//! Dispatcher-level tests driving `McpHandler` with in-process HTTP events.


/// Shared handler and request fixtures
#[cfg(test)]
pub(crate) mod fixtures {
    use {
        crate::{
            content_types::{HandlerOutput, PromptMessage, ToolResult},
            framework::{McpHandlerBuilder, Resource, Signature},
            handler::McpHandler,
            http::{HttpEvent, HttpResponse},
            schema::{EnumType, ParamType, SchemaType},
            session::{InMemorySessionStore, SessionStore},
        },
        serde::Deserialize,
        serde_json::{json, Value},
        std::sync::Arc,
    };

    pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum Color {
        Red,
        Green,
    }

    impl SchemaType for Color {
        fn param_type() -> ParamType {
            ParamType::Enum(EnumType::new("Color", ["red", "green"]))
        }
    }

    /// Registrations shared by stateful and stateless fixtures
    pub fn builder() -> McpHandlerBuilder {
        McpHandlerBuilder::new("test-server", "1.2.3")
            .with_tool(
                Signature::new("add")
                    .doc("Add two integers.\n\nReturns the sum as text.")
                    .param::<i64>("a")
                    .param::<i64>("b"),
                |args, _ctx| async move {
                    let a: i64 = args.require("a")?;
                    let b: i64 = args.require("b")?;
                    Ok(json!(a + b))
                },
            )
            .with_tool(
                Signature::new("paint").param::<Color>("color"),
                |args, _ctx| async move {
                    let color: Color = args.require("color")?;
                    Ok(format!("painted {color:?}"))
                },
            )
            .with_tool(Signature::new("fail"), |_args, _ctx| async move {
                Err::<String, _>(anyhow::anyhow!("boom"))
            })
            .with_tool(Signature::new("explode"), |_args, _ctx| async move {
                if true {
                    panic!("kaboom");
                }
                Ok("unreachable")
            })
            .with_tool(Signature::new("logo"), |_args, _ctx| async move {
                Ok(HandlerOutput::bytes(PNG_BYTES))
            })
            .with_tool(Signature::new("multi"), |_args, _ctx| async move {
                Ok(ToolResult::new(vec![
                    crate::content_types::ContentItem::text("first"),
                    crate::content_types::ContentItem::text("second"),
                ]))
            })
            .with_tool(Signature::new("counter"), |_args, ctx| async move {
                let mut count = 0u64;
                ctx.update_session(|session| {
                    count = session.get::<u64>("count").unwrap_or(0) + 1;
                    session.set("count", count)
                })
                .await?;
                Ok(count.to_string())
            })
            .with_prompt(
                Signature::new("greet")
                    .description("Greet someone")
                    .param::<String>("name"),
                |args, _ctx| async move {
                    let name: String = args.require("name")?;
                    Ok(vec![
                        PromptMessage::user(format!("Say hello to {name}")),
                        PromptMessage::assistant(format!("Hello, {name}!")),
                    ])
                },
            )
            .with_prompt(Signature::new("broken"), |_args, _ctx| async move {
                Err::<String, _>(anyhow::anyhow!("template missing"))
            })
            .with_resource(
                Resource::text("test://static", "static", "static body").description("Fixed text"),
            )
            .with_resource(
                Resource::dynamic("test://dynamic", "dynamic", || async {
                    Ok("generated".to_string())
                })
                .mime_type("text/markdown"),
            )
            .with_resource(Resource::dynamic("test://broken", "broken", || async {
                Err(anyhow::anyhow!("disk on fire"))
            }))
    }

    pub fn stateful_handler() -> McpHandler {
        builder()
            .with_session_store(Arc::new(InMemorySessionStore::new()))
            .build()
    }

    pub fn stateless_handler() -> McpHandler {
        builder().build()
    }

    pub fn rpc(id: Value, method: &str, params: Value) -> String {
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
    }

    pub async fn post(handler: &McpHandler, body: impl Into<String>, session_id: Option<&str>) -> HttpResponse {
        handler.handle_request(HttpEvent::json_post(body, session_id)).await
    }

    /// Run `initialize` and return the issued session id
    pub async fn initialize(handler: &McpHandler) -> String {
        let response = post(handler, rpc(json!(0), "initialize", json!({})), None).await;
        assert_eq!(response.status_code, 200);
        response
            .header("mcp-session-id")
            .expect("initialize must issue a session id")
            .to_string()
    }

    pub fn body(response: &HttpResponse) -> Value {
        response.json_body().expect("response body must be JSON")
    }

    /// Store whose every operation fails
    pub struct FailingStore;

    #[async_trait::async_trait]
    impl SessionStore for FailingStore {
        async fn create(&self) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("store offline"))
        }

        async fn get(&self, _session_id: &str) -> anyhow::Result<Option<crate::session::SessionPayload>> {
            Err(anyhow::anyhow!("store offline"))
        }

        async fn update(
            &self,
            _session_id: &str,
            _payload: crate::session::SessionPayload,
        ) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("store offline"))
        }

        async fn delete(&self, _session_id: &str) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("store offline"))
        }
    }
}
