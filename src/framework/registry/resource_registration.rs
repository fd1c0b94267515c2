//! Resource registration methods for Registry.

use {
    super::{ContentFunction, Registry},
    crate::{content_types::ResourceContent, types::ResourceInfo},
    anyhow::Result,
    futures_util::FutureExt,
    std::{fmt, future::Future, sync::Arc},
    tracing::{debug, warn},
};

const DEFAULT_MIME_TYPE: &str = "text/plain";

enum ResourceBody {
    Static(String),
    Dynamic(ContentFunction),
}

/// A URI-addressed resource with either literal content or a content function
pub struct Resource {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: String,
    body: ResourceBody,
}

impl Resource {
    /// Resource whose content is fixed at registration time
    pub fn text(uri: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            body: ResourceBody::Static(content.into()),
        }
    }

    /// Resource whose content is produced on every read
    pub fn dynamic<F, Fut>(uri: impl Into<String>, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let producer = Arc::new(producer);
        let function: ContentFunction = Box::new(move || {
            let producer = Arc::clone(&producer);
            async move { producer().await }.boxed()
        });
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            body: ResourceBody::Dynamic(function),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.body, ResourceBody::Dynamic(_))
    }

    pub fn info(&self) -> ResourceInfo {
        ResourceInfo {
            uri: self.uri.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
        }
    }

    /// Produce the content: stored text for static resources, the content
    /// function's output for dynamic ones.
    pub async fn read(&self) -> Result<ResourceContent> {
        let text = match &self.body {
            ResourceBody::Static(content) => content.clone(),
            ResourceBody::Dynamic(producer) => producer().await?,
        };
        Ok(ResourceContent {
            uri: self.uri.clone(),
            mime_type: self.mime_type.clone(),
            text,
        })
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("uri", &self.uri)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

impl Registry {
    /// Register a resource under its URI, replacing any earlier one
    pub fn add_resource(&mut self, resource: Resource) {
        let uri = resource.uri.clone();
        if self.resources.insert(uri.clone(), resource) {
            warn!(uri = %uri, "Resource registered twice, replacing earlier registration");
        } else {
            debug!(uri = %uri, "Registered resource");
        }
    }

    /// Register a dynamic resource from a content function
    pub fn register_resource<F, Fut>(
        &mut self,
        uri: &str,
        name: &str,
        description: Option<&str>,
        mime_type: Option<&str>,
        producer: F,
    ) where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let mut resource = Resource::dynamic(uri, name, producer)
            .mime_type(mime_type.unwrap_or(DEFAULT_MIME_TYPE));
        if let Some(description) = description {
            resource = resource.description(description);
        }
        self.add_resource(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_static_resource_read() {
        let resource = Resource::text("notes://about", "about", "A notebook").description("About");
        assert!(!resource.is_dynamic());

        let content = resource.read().await.unwrap();
        assert_eq!(content.uri, "notes://about");
        assert_eq!(content.mime_type, "text/plain");
        assert_eq!(content.text, "A notebook");
    }

    #[tokio::test]
    async fn test_dynamic_resource_runs_on_every_read() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let mut registry = Registry::new();
        registry.register_resource("notes://count", "count", None, Some("application/json"), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(format!("{{\"reads\":{n}}}")) }
        });

        let resource = registry.resource("notes://count").unwrap();
        let first = resource.read().await.unwrap();
        let second = resource.read().await.unwrap();
        assert_eq!(first.text, "{\"reads\":1}");
        assert_eq!(second.text, "{\"reads\":2}");
        assert_eq!(second.mime_type, "application/json");
        assert!(registry.resource("notes://missing").is_none());
    }

    #[test]
    fn test_list_resources() {
        let mut registry = Registry::new();
        registry.add_resource(Resource::text("a://1", "one", "1"));
        registry.add_resource(Resource::text("a://2", "two", "2").mime_type("text/markdown"));

        let infos = registry.list_resources();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].mime_type, "text/markdown");
        assert_eq!(registry.resource_count(), 2);
    }
}
