use crate::backend::BackendType;

/// Configuration for creating a backend
///
/// Built from the `backend` section of the application config; the factory
/// ignores the connection settings for the memory backend.
#[derive(Debug, Clone)]
pub struct DatabaseBackendConfig {
    /// The type of backend to use
    pub backend_type: BackendType,

    /// Connection URL for the storage backend
    /// Examples:
    /// - SQLite file: "sqlite:./records.db"
    /// - SQLite in memory: "sqlite::memory:" or ":memory:"
    pub connection_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseBackendConfig {
    pub fn new(backend_type: BackendType, connection_url: String) -> Self {
        Self {
            backend_type,
            connection_url,
            max_connections: 10,
            connection_timeout: 30,
        }
    }

    /// Create a SQLite configuration
    pub fn sqlite(connection_url: String) -> Self {
        Self::new(BackendType::Sqlite, connection_url)
    }

    /// Create an in-memory SQLite configuration for testing
    pub fn memory_sqlite() -> Self {
        Self::sqlite("sqlite::memory:".to_string())
    }

    /// Create a configuration for the in-memory record store
    pub fn memory() -> Self {
        Self::new(BackendType::Memory, String::new())
    }

    /// Set maximum connections
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set connection timeout
    pub fn with_connection_timeout(mut self, timeout_seconds: u64) -> Self {
        self.connection_timeout = timeout_seconds;
        self
    }

    /// Check if this is an in-memory SQLite database
    ///
    /// Every connection to such a database sees its own copy, so the pool is
    /// pinned to a single connection.
    pub fn is_memory_database(&self) -> bool {
        let url = self.connection_url.as_str();
        url == ":memory:" || url == "sqlite::memory:" || url.contains("mode=memory")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.backend_type == BackendType::Memory {
            return Ok(());
        }

        if self.connection_url.is_empty() {
            return Err("Connection URL cannot be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("Max connections must be greater than 0".to_string());
        }

        if !self.connection_url.starts_with("sqlite:")
            && self.connection_url != ":memory:"
            && !self.connection_url.ends_with(".db")
            && !self.connection_url.ends_with(".sqlite")
        {
            return Err("SQLite connection URL must start with 'sqlite:', be ':memory:', or end with '.db' or '.sqlite'".to_string());
        }

        Ok(())
    }
}

impl Default for DatabaseBackendConfig {
    fn default() -> Self {
        Self::memory()
    }
}
