//! HTTP API module.
//!
//! The axum query surface over a loaded catalog, its response types and the
//! pipeline log broadcaster.

pub mod logs;
pub mod server;
pub mod state;
pub mod types;

pub use logs::*;
pub use server::{build_router, start_server};
pub use state::{AppState, CatalogSnapshot};
pub use types::*;
