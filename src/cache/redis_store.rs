//! Remote Store Adapter
//!
//! Wraps a Redis connection manager behind [`KvStore`]. Every call is bounded
//! by the configured timeout so a slow or unreachable server surfaces as an
//! error instead of a hung request.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::cache::backend::{Backend, KvStore, ScanPage, SetOptions};
use crate::error::{CacheError, Result};

/// Redis-backed store, shared by every process pointed at the same server.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    /// Connects to `url`, failing if the initial connection cannot be made
    /// within `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(timeout))??;
        info!(timeout_ms = timeout.as_millis() as u64, "Connected to remote store");
        Ok(Self { conn, timeout })
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("GET").arg(key).to_owned();
        self.bounded(cmd.query_async(&mut conn)).await
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        // EX 0 is rejected by the server
        cmd.arg(key).arg(value).arg("EX").arg(options.ttl_secs.max(1));
        if options.only_if_absent {
            cmd.arg("NX");
        }
        // "OK" on write, nil when NX found the key held
        let reply: Option<String> = self.bounded(cmd.query_async(&mut conn)).await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("DEL").arg(key).to_owned();
        let _removed: u64 = self.bounded(cmd.query_async(&mut conn)).await?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(key);
        }
        let _removed: u64 = self.bounded(cmd.query_async(&mut conn)).await?;
        Ok(())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .to_owned();
        let (cursor, keys): (u64, Vec<String>) = self.bounded(cmd.query_async(&mut conn)).await?;
        Ok(ScanPage { cursor, keys })
    }

    fn backend(&self) -> Backend {
        Backend::Redis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = RedisStore::connect("not a url", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server_fails() {
        // Port 1 is reserved and refuses connections
        let result = RedisStore::connect("redis://127.0.0.1:1/", Duration::from_millis(500)).await;
        assert!(result.is_err());
    }
}
