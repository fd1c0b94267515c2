//! Tool and prompt registration methods for Registry.

use {
    super::{HandlerFunction, RegisteredPrompt, RegisteredTool, Registry},
    crate::{
        content_types::HandlerOutput,
        framework::context::{Arguments, RequestContext},
        schema::{InputSchema, ParamType, SchemaType},
        types::{PromptDefinition, ToolDefinition},
    },
    anyhow::Result,
    futures_util::FutureExt,
    std::{future::Future, sync::Arc},
    tracing::{debug, warn},
};

/// Declaration of a tool or prompt: public name, description and parameters.
///
/// The advertised description is the explicit one when set, otherwise the
/// first paragraph of the attached documentation, otherwise empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    name: String,
    description: Option<String>,
    doc: Option<String>,
    schema: InputSchema,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Explicit description, takes precedence over `doc`
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Long-form documentation; its first paragraph becomes the description
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param<T: SchemaType>(mut self, name: impl Into<String>) -> Self {
        self.schema = self.schema.param::<T>(name);
        self
    }

    pub fn param_type(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.schema = self.schema.param_type(name, ty);
        self
    }

    pub fn schema(mut self, schema: InputSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolved_description(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.doc.as_deref().map(first_paragraph))
            .unwrap_or_default()
    }
}

/// First paragraph of a documentation block, with surrounding blank lines
/// and per-line indentation removed.
pub(crate) fn first_paragraph(doc: &str) -> String {
    doc.lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap<F, Fut, O>(handler: F) -> HandlerFunction
where
    F: Fn(Arguments, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O>> + Send + 'static,
    O: Into<HandlerOutput>,
{
    let handler = Arc::new(handler);
    Box::new(move |args, ctx| {
        let handler = Arc::clone(&handler);
        async move {
            let output = handler(args, ctx).await?;
            Ok::<HandlerOutput, anyhow::Error>(output.into())
        }
        .boxed()
    })
}

impl Registry {
    /// Register a tool implementation under the signature's name.
    ///
    /// # Examples
    /// ```rust
    /// use lambdamcp::framework::{Registry, Signature};
    /// use lambdamcp::content_types::ToolResult;
    ///
    /// let mut registry = Registry::new();
    /// registry.register_tool(
    ///     Signature::new("note_take")
    ///         .doc("Takes a note and saves it.\n\nLonger usage notes.")
    ///         .param::<String>("content"),
    ///     |args, _ctx| async move {
    ///         let content: String = args.require("content")?;
    ///         Ok(ToolResult::text(format!("saved: {content}")))
    ///     },
    /// );
    /// assert_eq!(registry.list_tools()[0].description, "Takes a note and saves it.");
    /// ```
    pub fn register_tool<F, Fut, O>(&mut self, signature: Signature, handler: F)
    where
        F: Fn(Arguments, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        O: Into<HandlerOutput>,
    {
        let definition = ToolDefinition {
            name: signature.name.clone(),
            description: signature.resolved_description(),
            input_schema: signature.schema.to_json_schema(),
        };
        let name = signature.name.clone();
        let tool = RegisteredTool {
            definition,
            schema: signature.schema,
            function: wrap(handler),
        };
        if self.tools.insert(name.clone(), tool) {
            warn!(tool = %name, "Tool registered twice, replacing earlier registration");
        } else {
            debug!(tool = %name, "Registered tool");
        }
    }

    /// Register a prompt template under the signature's name.
    pub fn register_prompt<F, Fut, O>(&mut self, signature: Signature, handler: F)
    where
        F: Fn(Arguments, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        O: Into<HandlerOutput>,
    {
        let definition = PromptDefinition {
            name: signature.name.clone(),
            description: signature.resolved_description(),
            input_schema: signature.schema.to_json_schema(),
        };
        let name = signature.name;
        let prompt = RegisteredPrompt {
            definition,
            function: wrap(handler),
        };
        if self.prompts.insert(name.clone(), prompt) {
            warn!(prompt = %name, "Prompt registered twice, replacing earlier registration");
        } else {
            debug!(prompt = %name, "Registered prompt");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_types::PromptMessage;
    use serde_json::json;

    #[test]
    fn test_first_paragraph() {
        let doc = "\n    Takes a note.\n    Keeps it.\n\n    Details here.\n";
        assert_eq!(first_paragraph(doc), "Takes a note.\nKeeps it.");
        assert_eq!(first_paragraph(""), "");
    }

    #[test]
    fn test_description_precedence() {
        let sig = Signature::new("t").doc("From docs.\n\nMore.");
        assert_eq!(sig.resolved_description(), "From docs.");

        let sig = sig.description("Explicit");
        assert_eq!(sig.resolved_description(), "Explicit");

        assert_eq!(Signature::new("t").resolved_description(), "");
    }

    #[test]
    fn test_register_tool_builds_definition() {
        let mut registry = Registry::new();
        registry.register_tool(
            Signature::new("note_find").description("Find notes").param::<String>("context"),
            |_args, _ctx| async move { Ok("none") },
        );

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "note_find");
        assert_eq!(
            tools[0].input_schema,
            json!({
                "type": "object",
                "properties": {"context": {"type": "string"}},
                "required": ["context"]
            })
        );
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let mut registry = Registry::new();
        registry.register_tool(Signature::new("a").description("first"), |_a, _c| async move { Ok("1") });
        registry.register_tool(Signature::new("b"), |_a, _c| async move { Ok("2") });
        registry.register_tool(Signature::new("a").description("second"), |_a, _c| async move { Ok("3") });

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "a");
        assert_eq!(tools[0].description, "second");
    }

    #[test]
    fn test_register_prompt() {
        let mut registry = Registry::new();
        registry.register_prompt(
            Signature::new("greet").param::<String>("name"),
            |args, _ctx| async move {
                let name: String = args.require("name")?;
                Ok(vec![PromptMessage::user(format!("Say hello to {name}"))])
            },
        );

        let prompts = registry.list_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].input_schema["required"], json!(["name"]));
        assert!(registry.prompt("greet").is_some());
        assert!(registry.prompt("other").is_none());
    }
}
