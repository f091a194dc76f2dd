//! clubhub-server: HTTP handlers for the club membership site
//!
//! Members, events and blogs live in one document database; handlers share
//! a lazily created, process-wide connection and answer with JSON.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DatabaseConfig, MemoryStore, MongoStore, Store};
pub use http::{build_router, run_server, AppState, ServerConfig};
