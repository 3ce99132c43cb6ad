//! Cache Module
//!
//! Get-or-set caching with TTL tiers, pattern invalidation and lock-based
//! stampede protection, over Redis or an in-process fallback store.

mod backend;
mod entry;
mod facade;
pub mod keys;
mod memory;
mod policy;
mod redis_store;
mod stats;


// Re-export public types
pub use backend::{Backend, KvStore, ScanPage, SetOptions};
pub use facade::Cache;
pub use memory::MemoryStore;
pub use policy::{lock_ttl_secs, CacheTier};
pub use redis_store::RedisStore;
pub use stats::CacheStats;

// == Public Constants ==
/// Lower bound on a population lock's expiry, in seconds
pub const MIN_LOCK_TTL_SECS: u64 = 30;

/// Poll schedule for callers waiting on another caller's population
pub const RETRY_BACKOFF_MS: [u64; 3] = [100, 200, 300];

/// Value stored under a held lock key
pub const LOCK_MARKER: &str = "1";

/// Keys requested per SCAN round trip
pub const SCAN_COUNT: usize = 100;

/// Keys per DEL request during pattern deletes
pub const DELETE_BATCH_SIZE: usize = 100;
