//! In-Process Fallback Store
//!
//! HashMap-backed store with lazy expiry on read and a periodic sweep.
//! Used when no remote store is configured. Same contract as the remote
//! adapter, but nothing here is shared across processes.

use std::collections::HashMap;

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::backend::{Backend, KvStore, ScanPage, SetOptions};
use crate::cache::entry::MemoryEntry;
use crate::error::Result;

// == Memory Store ==
/// Process-local key-value store with per-entry expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage, lock entries included
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: evict, unless a writer replaced it since the read guard dropped
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool> {
        let mut entries = self.entries.write().await;

        // Check and insert happen under the same guard, so at most one
        // conditional writer wins per key
        if options.only_if_absent {
            if let Some(existing) = entries.get(key) {
                if !existing.is_expired() {
                    return Ok(false);
                }
            }
        }

        entries.insert(
            key.to_string(),
            MemoryEntry::new(value.to_string(), options.ttl_secs),
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage> {
        let regex = glob_to_regex(pattern)?;
        let now = Instant::now();

        let mut matched: Vec<String> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|(key, entry)| !entry.is_expired_at(now) && regex.is_match(key))
                .map(|(key, _)| key.clone())
                .collect()
        };
        // Stable order so an offset cursor resumes where the last page ended
        matched.sort_unstable();

        let start = (cursor as usize).min(matched.len());
        let end = start.saturating_add(count.max(1)).min(matched.len());
        let next = if end >= matched.len() { 0 } else { end as u64 };

        Ok(ScanPage {
            cursor: next,
            keys: matched[start..end].to_vec(),
        })
    }

    /// Single pass under the write guard instead of scan-then-delete.
    ///
    /// Expired matches are dropped too but only live ones are counted.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let regex = glob_to_regex(pattern)?;
        let now = Instant::now();
        let mut removed = 0;
        let mut entries = self.entries.write().await;
        entries.retain(|key, entry| {
            if !regex.is_match(key) {
                return true;
            }
            if !entry.is_expired_at(now) {
                removed += 1;
            }
            false
        });
        Ok(removed)
    }

    fn backend(&self) -> Backend {
        Backend::Memory
    }
}

// == Glob Translation ==
/// Translates a store glob into an anchored regular expression.
///
/// `*` matches any run of characters and `?` exactly one; everything else
/// is matched literally.
pub(crate) fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    Ok(Regex::new(&source)?)
}
