//! SQLite-backed record store
//!
//! ```text
//! RecordQuery (ordering + slice)
//!     ↓
//! sqlite.rs   SELECT … ORDER BY <registry column> LIMIT ?1 OFFSET ?2
//!     ↓
//! schema.rs   users u LEFT JOIN animals a
//! ```

pub mod config;
pub mod schema;
pub mod sqlite;

pub use config::DatabaseBackendConfig;
pub use sqlite::SqliteBackend;
