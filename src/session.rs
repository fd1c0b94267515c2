//! Session storage
//!
//! The dispatcher talks to session persistence only through `SessionStore`.
//! Two stores ship with the crate: `NoOpSessionStore` for stateless
//! deployments and the dashmap-backed `InMemorySessionStore`. Durable
//! backends live with the embedding application.

use {
    anyhow::Result,
    async_trait::async_trait,
    dashmap::DashMap,
    serde::{de::DeserializeOwned, Serialize},
    serde_json::{Map, Value},
    tracing::debug,
    uuid::Uuid,
};

/// Arbitrary key-value state kept for a session
pub type SessionPayload = Map<String, Value>;

/// Pluggable persistence for session state, keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session and return its id
    async fn create(&self) -> Result<String>;

    /// Fetch the payload of a session, `None` when it does not exist
    async fn get(&self, session_id: &str) -> Result<Option<SessionPayload>>;

    /// Replace the payload of an existing session
    async fn update(&self, session_id: &str, payload: SessionPayload) -> Result<bool>;

    /// Remove a session
    async fn delete(&self, session_id: &str) -> Result<bool>;

    /// Stateless stores let requests through without a session id
    fn is_stateless(&self) -> bool {
        false
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Store for stateless deployments: nothing is persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSessionStore;

#[async_trait]
impl SessionStore for NoOpSessionStore {
    async fn create(&self) -> Result<String> {
        Ok(new_session_id())
    }

    async fn get(&self, _session_id: &str) -> Result<Option<SessionPayload>> {
        Ok(None)
    }

    async fn update(&self, _session_id: &str, _payload: SessionPayload) -> Result<bool> {
        Ok(false)
    }

    async fn delete(&self, _session_id: &str) -> Result<bool> {
        Ok(false)
    }

    fn is_stateless(&self) -> bool {
        true
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionPayload>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<String> {
        let session_id = new_session_id();
        self.sessions.insert(session_id.clone(), SessionPayload::new());
        debug!(session_id = %session_id, total = self.sessions.len(), "Session created");
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionPayload>> {
        Ok(self.sessions.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, session_id: &str, payload: SessionPayload) -> Result<bool> {
        match self.sessions.get_mut(session_id) {
            Some(mut entry) => {
                *entry = payload;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        Ok(self.sessions.remove(session_id).is_some())
    }
}

/// Typed view over a session payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    data: SessionPayload,
}

impl SessionData {
    pub fn new(data: SessionPayload) -> Self {
        Self { data }
    }

    /// Read a value, `None` when absent or not deserializable as `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn raw(&self) -> &SessionPayload {
        &self.data
    }

    pub fn into_raw(self) -> SessionPayload {
        self.data
    }
}
