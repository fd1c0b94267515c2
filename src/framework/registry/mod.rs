//! Registry for tools, prompts and resources.
//!
//! Three independent name-keyed collections, populated once at startup and
//! read by the dispatcher afterwards. Registering a name that already exists
//! replaces the earlier entry in place, so listing order stays the order of
//! first registration.

mod resource_registration;
mod tool_registration;

pub use resource_registration::Resource;
pub use tool_registration::Signature;

use {
    super::context::{Arguments, RequestContext},
    crate::{
        content_types::HandlerOutput,
        schema::InputSchema,
        types::{PromptDefinition, ResourceInfo, ToolDefinition},
    },
    anyhow::Result,
    futures_util::future::BoxFuture,
    serde_json::{Map, Value},
    std::collections::HashMap,
};

/// Type alias for tool and prompt implementations.
///
/// Implementations receive the call's keyword arguments and the request
/// context, and resolve to a `HandlerOutput` that the dispatcher normalizes.
pub type HandlerFunction = Box<
    dyn Fn(Arguments, RequestContext) -> BoxFuture<'static, Result<HandlerOutput>> + Send + Sync,
>;

/// Zero-argument content producer behind a dynamic resource
pub type ContentFunction = Box<dyn Fn() -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Insertion-ordered, name-keyed collection
pub(crate) struct Entries<V> {
    index: HashMap<String, usize>,
    items: Vec<V>,
}

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<V> Entries<V> {
    /// Insert or replace; returns `true` when an entry was replaced
    pub(crate) fn insert(&mut self, key: String, value: V) -> bool {
        match self.index.get(&key) {
            Some(&position) => {
                self.items[position] = value;
                true
            }
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(value);
                false
            }
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.items.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// A registered tool: its advertised definition plus implementation
pub struct RegisteredTool {
    pub(crate) definition: ToolDefinition,
    pub(crate) schema: InputSchema,
    pub(crate) function: HandlerFunction,
}

impl RegisteredTool {
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Replace arguments declared as enums with the matching member value;
    /// everything else passes through unchanged.
    pub fn coerce_arguments(&self, arguments: Map<String, Value>) -> Result<Arguments> {
        let mut converted = Map::with_capacity(arguments.len());
        for (name, value) in arguments {
            let value = match self.schema.get(&name).and_then(|ty| ty.as_enum()) {
                Some(enum_type) => enum_type.coerce(&value)?,
                None => value,
            };
            converted.insert(name, value);
        }
        Ok(Arguments::new(converted))
    }

    /// Coerce the arguments and run the implementation
    pub async fn call(&self, arguments: Map<String, Value>, ctx: RequestContext) -> Result<HandlerOutput> {
        let arguments = self.coerce_arguments(arguments)?;
        (self.function)(arguments, ctx).await
    }
}

/// A registered prompt template
pub struct RegisteredPrompt {
    pub(crate) definition: PromptDefinition,
    pub(crate) function: HandlerFunction,
}

impl RegisteredPrompt {
    pub fn definition(&self) -> &PromptDefinition {
        &self.definition
    }

    /// Run the template with the raw arguments
    pub async fn call(&self, arguments: Map<String, Value>, ctx: RequestContext) -> Result<HandlerOutput> {
        (self.function)(Arguments::new(arguments), ctx).await
    }
}

/// Registry for managing tools, prompts and resources within a handler
#[derive(Default)]
pub struct Registry {
    pub(crate) tools: Entries<RegisteredTool>,
    pub(crate) prompts: Entries<RegisteredPrompt>,
    pub(crate) resources: Entries<Resource>,
}

impl Registry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn prompt(&self, name: &str) -> Option<&RegisteredPrompt> {
        self.prompts.get(name)
    }

    pub fn resource(&self, uri: &str) -> Option<&Resource> {
        self.resources.get(uri)
    }

    /// Tool definitions in registration order
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    /// Prompt definitions in registration order
    pub fn list_prompts(&self) -> Vec<PromptDefinition> {
        self.prompts.values().map(|p| p.definition.clone()).collect()
    }

    /// Resource descriptors in registration order
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.resources.values().map(Resource::info).collect()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}
