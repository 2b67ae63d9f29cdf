//! Per-browser session state touched by the OAuth callback.
//!
//! The callback only needs `get` and `set` on JSON values. In the server
//! that is a [`tower_sessions::Session`]; [`MemorySession`] stands in for
//! it when the flow is driven directly.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Debug, Error)]
#[error("session store error: {0}")]
pub struct SessionStoreError(String);

impl SessionStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<tower_sessions::session::Error> for SessionStoreError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self(err.to_string())
    }
}

/// Key/value view of one browser's session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError>;

    /// Overwrites whatever was stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError>;
}

#[async_trait]
impl SessionStore for tower_sessions::Session {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(tower_sessions::Session::get::<Value>(self, key).await?)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.insert(key, value).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySession {
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}
