use std::{future::Future, time::Duration as StdDuration};

use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use time::Duration;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::session::ExpiringStore,
    infra::error::InfraError,
};

/// `ExpiringStore` backed by Redis. Every command is bounded by `timeout`.
#[derive(Clone)]
pub struct RedisExpiringStore {
    manager: ConnectionManager,
    timeout: StdDuration,
}

impl RedisExpiringStore {
    pub async fn connect(redis_url: &str, timeout: StdDuration) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager, timeout })
    }
}

/// Runs one Redis command, mapping failures and timeouts to `StoreUnavailable`.
async fn bounded<T, F>(timeout: StdDuration, op: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = Result<T, RedisError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(op, error = %e, "Redis command failed");
            Err(AppError::StoreUnavailable(format!("{op} failed: {e}")))
        }
        Err(_) => {
            tracing::warn!(op, timeout_ms = timeout.as_millis() as u64, "Redis command timed out");
            Err(AppError::StoreUnavailable(format!("{op} timed out")))
        }
    }
}

#[async_trait]
impl ExpiringStore for RedisExpiringStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        bounded(self.timeout, "GET", async move { conn.get(key).await }).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let ttl_secs = ttl.whole_seconds();
        if ttl_secs <= 0 {
            return Err(AppError::Internal(format!(
                "store ttl must be positive, got {ttl}"
            )));
        }
        let mut conn = self.manager.clone();
        bounded(self.timeout, "SET", async move {
            conn.set_ex::<_, _, ()>(key, value, ttl_secs as u64).await
        })
        .await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        bounded(self.timeout, "DEL", async move { conn.del::<_, ()>(key).await })
            .await
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        // Atomic GET + DEL so a value can only be consumed once.
        let script = redis::Script::new(
            r#"
            local value = redis.call('GET', KEYS[1])
            if value then
                redis.call('DEL', KEYS[1])
            end
            return value
            "#,
        );
        bounded(self.timeout, "GETDEL", async move {
            script.key(key).invoke_async(&mut conn).await
        })
        .await
    }
}
