//! Hand-off store for values shared between calculators.
//!
//! A calculator can leave a result under a session key (e.g. the column
//! dimensions from sizing) for a later calculator to pick up. Entries expire
//! after a TTL. Backed by Redis when configured, otherwise by process memory.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

#[derive(Clone)]
pub enum HandoffStore {
    Redis(RedisHandoff),
    Memory(MemoryHandoff),
}

impl HandoffStore {
    /// Connect to Redis when a URL is given, otherwise keep entries in memory.
    pub async fn connect(redis_url: Option<&str>, ttl_seconds: u64) -> Result<Self> {
        match redis_url {
            Some(url) => Ok(Self::Redis(RedisHandoff::new(url, ttl_seconds).await?)),
            None => {
                tracing::info!("REDIS_URL not set, using in-memory hand-off store");
                Ok(Self::Memory(MemoryHandoff::new(ttl_seconds)))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Redis(_) => "redis",
            Self::Memory(_) => "memory",
        }
    }

    /// Get a value; missing, expired and undecodable entries all read as `None`.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self {
            Self::Redis(r) => r.get_raw(key).await,
            Self::Memory(m) => m.get_raw(key),
        }?;

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = key, "Hand-off hit");
                Some(value)
            }
            Err(e) => {
                warn!(key = key, error = %e, "Failed to deserialize hand-off value");
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value).context("Failed to serialize hand-off value")?;
        match self {
            Self::Redis(r) => r.set_raw(key, data).await,
            Self::Memory(m) => {
                m.set_raw(key, data);
                Ok(())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<bool> {
        match self {
            Self::Redis(r) => r.delete(key).await,
            Self::Memory(m) => Ok(m.delete(key)),
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        match self {
            Self::Redis(r) => r.health_check().await,
            Self::Memory(_) => Ok(()),
        }
    }
}

// ============================================================================
// Redis
// ============================================================================

/// Redis-backed store with connection pooling.
#[derive(Clone)]
pub struct RedisHandoff {
    conn: ConnectionManager,
    ttl: Duration,
}

impl RedisHandoff {
    pub async fn new(redis_url: &str, ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis hand-off store connected");

        Ok(Self {
            conn,
            ttl: Duration::from_secs(ttl_seconds),
        })
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(key = key, error = %e, "Redis get error");
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, data: String) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, data, self.ttl.as_secs())
            .await
            .context("Failed to store hand-off value")?;
        debug!(key = key, ttl_secs = self.ttl.as_secs(), "Stored hand-off value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let deleted: i32 = conn.del(key).await.context("Failed to delete hand-off key")?;
        Ok(deleted > 0)
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local store; entries are dropped lazily once expired.
#[derive(Clone)]
pub struct MemoryHandoff {
    entries: Arc<RwLock<HashMap<String, (Instant, String)>>>,
    ttl: Duration,
}

impl MemoryHandoff {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some((expires_at, data)) if *expires_at > Instant::now() => {
                    return Some(data.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: drop it under the write lock.
        self.entries.write().remove(key);
        None
    }

    fn set_raw(&self, key: &str, data: String) {
        let mut entries = self.entries.write();
        let now = Instant::now();
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(key.to_string(), (now + self.ttl, data));
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }
}

/// Key builders for consistent hand-off key formats.
pub mod keys {
    /// Well-known key under which column sizing leaves its dimensions.
    pub const COLUMN_DIMENSIONS: &str = "column-dimensions";

    /// Session ids and entry names: 1-64 chars of `[A-Za-z0-9_-]`.
    pub fn is_valid_segment(segment: &str) -> bool {
        !segment.is_empty()
            && segment.len() <= 64
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn entry(session_id: &str, name: &str) -> String {
        format!("handoff:{}:{}", session_id, name)
    }

    pub fn column_dimensions(session_id: &str) -> String {
        entry(session_id, COLUMN_DIMENSIONS)
    }
}
