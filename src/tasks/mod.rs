//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a `Cache`.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries from the in-process fallback store

mod sweep;

pub use sweep::{spawn_sweep_task, SweepHandle};
