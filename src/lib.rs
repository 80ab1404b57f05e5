pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod query;
pub mod resource;
pub mod router;
pub mod startup;

// Re-export commonly used types for easier access
pub use models::{Animal, PaginationResult, User};
pub use parser::{PaginationRequest, SortOrder, SortSpec};
pub use query::{QueryOptions, QueryResponse};
