//! HTTP server for the Sablon record service.
//!
//! Exposes create, list, get, update and delete over `/sablon`, translating
//! service outcomes into status codes: 400 for anything the caller got
//! wrong, 404 for unknown identifiers and 500 for storage failures.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, StorageConfig};
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::AppState;
pub use router::build_router;
pub use server::SablonServer;
