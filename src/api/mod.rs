//! API Module
//!
//! Admin HTTP surface for operating the cache.
//!
//! # Endpoints
//! - `GET /health` - Health check with the active backend
//! - `GET /stats` - Cache counters
//! - `DELETE /keys/:key` - Drop one key
//! - `POST /invalidate` - Drop every key matching a glob pattern

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
