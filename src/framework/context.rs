//! Request-scoped context handed to tool, prompt and resource implementations.
//!
//! The dispatcher builds one `RequestContext` per HTTP request, binding the
//! session id resolved from the `mcp-session-id` header. It is passed by value
//! down the call chain and dropped when the request completes, so session
//! bindings never outlive or leak across requests.

use {
    crate::session::{SessionData, SessionPayload, SessionStore},
    anyhow::{anyhow, Result},
    serde::de::DeserializeOwned,
    serde_json::{Map, Value},
    std::{fmt, sync::Arc},
};

/// Session binding and store access for the request being handled.
///
/// ```rust,ignore
/// registry.register_tool(Signature::new("visit"), |_args, ctx: RequestContext| async move {
///     ctx.update_session(|session| {
///         let visits = session.get::<u64>("visits").unwrap_or(0);
///         session.set("visits", visits + 1)
///     })
///     .await?;
///     Ok("recorded")
/// });
/// ```
#[derive(Clone)]
pub struct RequestContext {
    session_id: Option<String>,
    store: Arc<dyn SessionStore>,
}

impl RequestContext {
    pub fn new(session_id: Option<String>, store: Arc<dyn SessionStore>) -> Self {
        Self { session_id, store }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub(crate) fn bind_session(&mut self, session_id: String) {
        self.session_id = Some(session_id);
    }

    /// Load the bound session, `None` without a binding or when the store has no such session
    pub async fn get_session(&self) -> Result<Option<SessionData>> {
        let Some(session_id) = self.session_id.as_deref() else {
            return Ok(None);
        };
        Ok(self.store.get(session_id).await?.map(SessionData::new))
    }

    /// Overwrite the bound session's payload
    pub async fn set_session(&self, payload: SessionPayload) -> Result<bool> {
        match self.session_id.as_deref() {
            Some(session_id) => self.store.update(session_id, payload).await,
            None => Ok(false),
        }
    }

    /// Read, mutate and write back the bound session. Not atomic: concurrent
    /// updates to the same session resolve as last write wins.
    pub async fn update_session<F>(&self, updater: F) -> Result<bool>
    where
        F: FnOnce(&mut SessionData) -> Result<()>,
    {
        let Some(mut session) = self.get_session().await? else {
            return Ok(false);
        };
        updater(&mut session)?;
        self.set_session(session.into_raw()).await
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("session_id", &self.session_id)
            .field("stateless", &self.store.is_stateless())
            .finish()
    }
}

/// Keyword arguments of a `tools/call` or `prompts/get` request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialize a required argument
    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| anyhow!("missing required argument '{name}'"))?;
        serde_json::from_value(value.clone())
            .map_err(|e| anyhow!("invalid value for argument '{name}': {e}"))
    }

    /// Deserialize an argument that may be absent or null
    pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.require(name).map(Some),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_raw(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}
