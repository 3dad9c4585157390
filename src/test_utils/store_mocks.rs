//! In-memory implementations of the expiring store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;
use time::Duration;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::session::ExpiringStore,
};

#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub value: String,
    pub ttl: Duration,
    expires_at: Instant,
}

/// In-memory implementation of ExpiringStore for testing.
///
/// Entries past their TTL behave as absent, matching Redis.
#[derive(Default)]
pub struct InMemoryExpiringStore {
    pub entries: Mutex<HashMap<String, StoredEntry>>,
}

impl InMemoryExpiringStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry for `key` (for test assertions).
    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .cloned()
    }

    /// Forces `key` past its TTL.
    pub fn expire(&self, key: &str) {
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            entry.expires_at = Instant::now();
        }
    }
}

#[async_trait]
impl ExpiringStore for InMemoryExpiringStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entry(key).map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let lifetime = std::time::Duration::from_secs(ttl.whole_seconds().max(0) as u64);
        self.entries.lock().unwrap().insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                ttl,
                expires_at: Instant::now() + lifetime,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        let value = self.entry(key).map(|e| e.value);
        self.entries.lock().unwrap().remove(key);
        Ok(value)
    }
}

enum FailMode {
    Never,
    Always,
    KeyPrefix(String),
}

/// Store that fails writes (and optionally reads) to simulate an unreachable Redis.
///
/// Deletes always succeed so cleanup paths can be observed.
pub struct FailingExpiringStore {
    inner: InMemoryExpiringStore,
    mode: Mutex<FailMode>,
}

impl FailingExpiringStore {
    pub fn always() -> Self {
        Self::with_mode(FailMode::Always)
    }

    pub fn never() -> Self {
        Self::with_mode(FailMode::Never)
    }

    /// Fails only `set` calls whose key starts with `prefix`.
    pub fn on_key_prefix(prefix: &str) -> Self {
        Self::with_mode(FailMode::KeyPrefix(prefix.to_string()))
    }

    fn with_mode(mode: FailMode) -> Self {
        Self {
            inner: InMemoryExpiringStore::new(),
            mode: Mutex::new(mode),
        }
    }

    pub fn fail_everything(&self) {
        *self.mode.lock().unwrap() = FailMode::Always;
    }

    pub fn inner(&self) -> &InMemoryExpiringStore {
        &self.inner
    }

    fn check(&self, key: &str, is_write: bool) -> AppResult<()> {
        let fails = match &*self.mode.lock().unwrap() {
            FailMode::Never => false,
            FailMode::Always => true,
            FailMode::KeyPrefix(prefix) => is_write && key.starts_with(prefix.as_str()),
        };
        if fails {
            return Err(AppError::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ExpiringStore for FailingExpiringStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check(key, false)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.check(key, true)?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        self.check(key, true)?;
        self.inner.take(key).await
    }
}
