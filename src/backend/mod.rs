use crate::error::AppResult;
use crate::models::{Animal, User};
use crate::query::RecordSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod database;
pub mod memory;

/// Supported backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    Memory,
    Sqlite,
}

/// Core backend abstraction
///
/// Lifecycle and loading operations every store provides. Reading goes
/// through [`RecordSource`], once per record type.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables if needed
    async fn init_schema(&self) -> AppResult<()>;

    /// Load animals; ids are taken from the records
    async fn insert_animals(&self, animals: &[Animal]) -> AppResult<()>;

    /// Load users together with their favorite animals
    async fn insert_users(&self, users: &[User]) -> AppResult<()>;
}

/// Everything the HTTP layer needs from a store
pub trait DataBackend: Backend + RecordSource<User> + RecordSource<Animal> {}

/// Automatic implementation for any type that implements all parts
impl<T> DataBackend for T where T: Backend + RecordSource<User> + RecordSource<Animal> {}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(
        config: &database::DatabaseBackendConfig,
    ) -> AppResult<Arc<dyn DataBackend>> {
        match config.backend_type {
            BackendType::Memory => Ok(Arc::new(memory::MemoryBackend::new())),
            BackendType::Sqlite => {
                let backend = database::SqliteBackend::connect(config).await?;
                Ok(Arc::new(backend))
            }
        }
    }
}
