//! Store Backend Module
//!
//! The capability the cache needs from a key-value store, resolved once at
//! construction time into either the remote adapter or the in-process fallback.

use std::fmt;

use async_trait::async_trait;

use crate::cache::{DELETE_BATCH_SIZE, SCAN_COUNT};
use crate::error::Result;

/// Which implementation sits behind a [`KvStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Shared remote store; locks are exclusive across processes
    Redis,
    /// Process-local map; locks are exclusive within this process only
    Memory,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Redis => "redis",
            Backend::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`KvStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOptions {
    /// Expiry in seconds
    pub ttl_secs: u64,
    /// Only write when the key is absent (or expired)
    pub only_if_absent: bool,
}

impl SetOptions {
    /// Unconditional overwrite with the given expiry.
    pub fn ttl(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            only_if_absent: false,
        }
    }

    /// Conditional write, the lock acquisition primitive.
    pub fn if_absent(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            only_if_absent: true,
        }
    }
}

/// One page of a cursor-based key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next call; `0` when iteration is complete
    pub cursor: u64,
    pub keys: Vec<String>,
}

/// Key-value store operations used by the cache.
///
/// Implementations report failures as errors; deciding to fail open is the
/// caller's job.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the stored payload, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` with an expiry. Returns `false` only when
    /// `only_if_absent` was requested and the key is already held.
    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn delete_many(&self, keys: &[String]) -> Result<()>;

    /// Non-blocking cursor iteration over keys matching a glob pattern.
    /// Start with cursor `0`; iteration ends when the returned cursor is `0`.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage>;

    /// Removes every key matching `pattern`, returning how many were removed.
    ///
    /// Collects the full key set with [`scan`](Self::scan), then deletes it in
    /// batches of [`DELETE_BATCH_SIZE`].
    async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let mut matched = Vec::new();
        let mut cursor = 0;
        loop {
            let page = self.scan(cursor, pattern, SCAN_COUNT).await?;
            matched.extend(page.keys);
            cursor = page.cursor;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may report a key more than once
        matched.sort_unstable();
        matched.dedup();

        for batch in matched.chunks(DELETE_BATCH_SIZE) {
            self.delete_many(batch).await?;
        }
        Ok(matched.len() as u64)
    }

    fn backend(&self) -> Backend;
}
