//! Session management
//!
//! Sessions live in an external store keyed by their opaque identifier.
//! Redis is used in production; expiry is delegated to the store's TTL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::cache::RedisPool;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::Session;

/// Storage contract for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session, replacing any previous value, expiring after `ttl_seconds`
    async fn save(&self, session: &Session, ttl_seconds: u64) -> Result<()>;

    async fn load(&self, id: &str) -> Result<Option<Session>>;

    /// Remove a session; unknown ids are ignored
    async fn destroy(&self, id: &str) -> Result<()>;

    async fn health_check(&self) -> Result<bool>;
}

fn session_key(id: &str) -> String {
    format!("session:{}", id)
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &Session, ttl_seconds: u64) -> Result<()> {
        let value = serde_json::to_string(session).context("Failed to serialize session")?;
        self.redis_pool
            .set(&session_key(&session.id), &value, Some(ttl_seconds))
            .await
    }

    async fn load(&self, id: &str) -> Result<Option<Session>> {
        match self.redis_pool.get(&session_key(id)).await? {
            Some(value) => {
                let session =
                    serde_json::from_str(&value).context("Failed to deserialize session")?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        self.redis_pool.delete(&session_key(id)).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.redis_pool.health_check().await
    }
}

/// Process-local session store honouring TTLs, for development and tests
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, (Session, Instant)>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &Session, ttl_seconds: u64) -> Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), (session.clone(), expires_at));
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                sessions.remove(id);
                Ok(None)
            }
            Some((session, _)) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Session manager creating, resolving and destroying user sessions
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: Arc<dyn SessionStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Create a new session for a user
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session> {
        let session = Session::new(user_id);
        self.store.save(&session, self.ttl_seconds).await?;

        info!(user_id = %user_id, "Created session");
        Ok(session)
    }

    /// Resolve a session identifier
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        if id.is_empty() {
            return Ok(None);
        }
        self.store.load(id).await
    }

    /// Delete a session
    pub async fn delete_session(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Ok(());
        }
        self.store.destroy(id).await
    }

    /// Get session store health status
    pub async fn health_check(&self) -> Result<bool> {
        self.store.health_check().await
    }
}
