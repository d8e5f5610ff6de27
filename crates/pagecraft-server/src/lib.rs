//! Pagecraft HTTP server.
//!
//! Wires together the core library, storage backend, AI client, and HTTP
//! routes into a running Axum server. Serves the owner JSON API at
//! `/v1/pages`, the visitor capture endpoints, and published pages at `/p/*`.

pub mod ai;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod state;
