//! Translation of `sort` / `page` / `pageSize` into an ordered, optionally
//! paginated read of a record collection.
//!
//! ```text
//! QueryParams → QueryOptions → OrderBy (resolved via PropertyRegistry)
//!     → RecordQuery → RecordSource::{count, materialize} → QueryResponse
//! ```

pub mod engine;
pub mod ordering;
pub mod property;
pub mod source;

pub use engine::{execute, QueryOptions, QueryParams, QueryResponse};
pub use ordering::OrderBy;
pub use property::{Property, PropertyRegistry, PropertyValue, Record};
pub use source::{RecordQuery, RecordSource};
