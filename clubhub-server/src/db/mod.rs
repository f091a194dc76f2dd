//! Database layer - connection cache, stored documents, and stores
//!
//! - One process-wide database handle, created on first use
//! - Email uniqueness lives in the store (unique index), not in
//!   check-then-insert handler logic
//! - No multi-document transactions; cascades are best-effort

pub mod connection;
pub mod documents;
pub mod memory;
pub mod mongo;
pub mod store;

pub use connection::{cached_database, DatabaseConfig};
pub use documents::{BlogDocument, EventDocument, MemberDocument};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{DashboardCounts, DbError, DepartmentCount, Store};
