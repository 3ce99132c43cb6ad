//! Recipe Cache - stampede-protected caching for the recipe platform
//!
//! Get-or-set caching with TTL tiers and pattern invalidation over Redis,
//! falling back to an in-process store when no remote store is configured.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{keys, Cache, CacheTier};
pub use config::Config;
