//! Memory Entry Module
//!
//! Defines the structure for entries held by the in-process fallback store.

use std::time::Duration;

use tokio::time::Instant;

// == Memory Entry ==
/// A single serialized payload with its absolute expiry.
#[derive(Debug, Clone)]
pub(crate) struct MemoryEntry {
    /// The stored payload (JSON text)
    pub value: String,
    /// Instant after which the entry is no longer readable
    pub expires_at: Instant,
}

impl MemoryEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_secs` seconds from now.
    pub fn new(value: String, ttl_secs: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry stays readable up to and including its expiry instant and is
    /// expired strictly after it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied instant,
    /// so a sweep can judge every entry against one clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}
