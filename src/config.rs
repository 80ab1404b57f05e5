use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::backend::database::DatabaseBackendConfig;
use crate::backend::BackendType;
use crate::error::{AppError, AppResult};
use crate::models::{Animal, User};
use crate::parser::{SortSpec, DEFAULT_PAGE_SIZE};
use crate::query::Record;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub endpoints: Vec<EndpointConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(rename = "type")]
    pub backend_type: BackendType,
    /// Connection URL, required for `sqlite`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Load the built-in sample records at startup
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_seed() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Users,
    Animals,
}

impl ResourceKind {
    /// Whether `spec` names a sortable property of this resource
    pub fn resolves(&self, spec: &SortSpec) -> bool {
        match self {
            ResourceKind::Users => User::registry().resolve(&spec.path).is_some(),
            ResourceKind::Animals => Animal::registry().resolve(&spec.path).is_some(),
        }
    }
}

/// A list endpoint served under `path`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EndpointConfig {
    pub path: String,
    pub resource: ResourceKind,
    /// Sort expression applied when the client sends no `sort`
    #[serde(default)]
    pub default_sort: Option<String>,
}

impl EndpointConfig {
    /// Parse and check the configured default sort.
    ///
    /// Unlike client input, a default sort that does not resolve is a
    /// configuration error.
    pub fn default_sort_spec(&self) -> AppResult<Option<SortSpec>> {
        let Some(spec) = SortSpec::parse(self.default_sort.as_deref()) else {
            return Ok(None);
        };

        if !self.resource.resolves(&spec) {
            return Err(AppError::Configuration(format!(
                "Default sort '{}' of endpoint {} does not name a sortable property",
                spec, self.path
            )));
        }

        Ok(Some(spec))
    }
}

impl BackendConfig {
    pub fn to_backend_config(&self) -> DatabaseBackendConfig {
        DatabaseBackendConfig::new(self.backend_type, self.url.clone().unwrap_or_default())
            .with_max_connections(self.max_connections)
            .with_connection_timeout(self.connection_timeout)
    }
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse YAML content after expanding environment variables
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let expanded = Self::expand_env_vars(content).map_err(AppError::Configuration)?;

        let app_config: AppConfig = serde_yaml::from_str(&expanded)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Default configuration: seeded in-memory store, three endpoints
    pub fn default_config() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            backend: BackendConfig {
                backend_type: BackendType::Memory,
                url: None,
                max_connections: 1,
                connection_timeout: 30,
                seed: true,
            },
            pagination: PaginationConfig::default(),
            endpoints: vec![
                EndpointConfig {
                    path: "/api/users".to_string(),
                    resource: ResourceKind::Users,
                    default_sort: None,
                },
                EndpointConfig {
                    path: "/api/users/by-email".to_string(),
                    resource: ResourceKind::Users,
                    default_sort: Some("email".to_string()),
                },
                EndpointConfig {
                    path: "/api/animals".to_string(),
                    resource: ResourceKind::Animals,
                    default_sort: None,
                },
            ],
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.endpoints.is_empty() {
            return Err(AppError::Configuration(
                "Configuration must contain at least one endpoint".to_string(),
            ));
        }

        if self.pagination.default_page_size == 0 {
            return Err(AppError::Configuration(
                "pagination.default_page_size must be greater than 0".to_string(),
            ));
        }

        self.backend
            .to_backend_config()
            .validate()
            .map_err(AppError::Configuration)?;

        let mut paths = HashSet::new();
        for endpoint in &self.endpoints {
            if !endpoint.path.starts_with('/') {
                return Err(AppError::Configuration(format!(
                    "Endpoint path must start with '/': {}",
                    endpoint.path
                )));
            }
            if endpoint.path == "/health" {
                return Err(AppError::Configuration(
                    "Endpoint path /health is reserved".to_string(),
                ));
            }
            if !paths.insert(endpoint.path.as_str()) {
                return Err(AppError::Configuration(format!(
                    "Duplicate endpoint path: {}",
                    endpoint.path
                )));
            }
            endpoint.default_sort_spec()?;
        }

        Ok(())
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> Result<String, String> {
        let mut expanded = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            expanded.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                // Unterminated reference is kept verbatim
                expanded.push_str(&rest[start..]);
                return Ok(expanded);
            };

            let expr = &after[..end];
            let (name, default) = match expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (expr, None),
            };

            match (std::env::var(name), default) {
                (Ok(value), _) => expanded.push_str(&value),
                (Err(_), Some(default)) => expanded.push_str(default),
                (Err(_), None) => {
                    return Err(format!(
                        "Environment variable {} not found and no default provided",
                        name
                    ))
                }
            }

            rest = &after[end + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
server:
  host: "0.0.0.0"
  port: 8080

backend:
  type: sqlite
  url: "${PQ_TEST_DB_URL:-sqlite::memory:}"
  max_connections: 4
  connection_timeout: 5

pagination:
  default_page_size: 20

endpoints:
  - path: /api/users
    resource: users
  - path: /api/users/sorted
    resource: users
    default_sort: "favoriteAnimal.name desc"
  - path: /api/animals
    resource: animals
"#;

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("PQ_TEST_PORT", "8081");

        let expanded = AppConfig::expand_env_vars("port: ${PQ_TEST_PORT:-3000}").unwrap();
        assert_eq!(expanded, "port: 8081");

        let expanded = AppConfig::expand_env_vars("host: \"${PQ_MISSING_VAR:-localhost}\"").unwrap();
        assert_eq!(expanded, "host: \"localhost\"");

        assert!(AppConfig::expand_env_vars("token: ${PQ_MISSING_VAR}").is_err());

        let expanded = AppConfig::expand_env_vars("broken: ${PQ_TEST_PORT").unwrap();
        assert_eq!(expanded, "broken: ${PQ_TEST_PORT");

        std::env::remove_var("PQ_TEST_PORT");
    }

    #[test]
    fn test_parse_sample() {
        let config = AppConfig::from_yaml(SAMPLE).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.backend_type, BackendType::Sqlite);
        assert_eq!(config.backend.url.as_deref(), Some("sqlite::memory:"));
        assert!(config.backend.seed);
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.endpoints[2].resource, ResourceKind::Animals);

        let spec = config.endpoints[1].default_sort_spec().unwrap().unwrap();
        assert_eq!(spec.to_string(), "favoriteAnimal.name desc");
        assert_eq!(config.endpoints[0].default_sort_spec().unwrap(), None);
    }

    #[test]
    fn test_config_file_loading() {
        let temp_file = std::env::temp_dir().join(format!("paged_query_{}.yaml", std::process::id()));
        std::fs::write(&temp_file, SAMPLE).unwrap();

        let config = AppConfig::load_from_file(&temp_file).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");

        std::fs::remove_file(&temp_file).unwrap();
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file("/nonexistent/config.yaml");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.backend.backend_type, BackendType::Memory);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.endpoints[1].default_sort.as_deref(), Some("email"));
    }

    #[test]
    fn test_pagination_section_is_optional() {
        let yaml = r#"
server: { host: 127.0.0.1, port: 3000 }
backend: { type: memory }
endpoints:
  - { path: /users, resource: users }
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.pagination, PaginationConfig::default());
        assert_eq!(config.backend.max_connections, 10);
        assert_eq!(config.backend.connection_timeout, 30);
    }

    #[test]
    fn test_backend_section_maps_to_pool_settings() {
        let config = AppConfig::from_yaml(SAMPLE).unwrap();
        let backend = config.backend.to_backend_config();

        assert_eq!(backend.backend_type, BackendType::Sqlite);
        assert_eq!(backend.connection_url, "sqlite::memory:");
        assert_eq!(backend.max_connections, 4);
        assert_eq!(backend.connection_timeout, 5);
    }

    #[test]
    fn test_unresolvable_default_sort_is_rejected() {
        let mut config = AppConfig::default_config();
        config.endpoints[1].default_sort = Some("firstName".to_string());
        assert!(matches!(config.validate(), Err(AppError::Configuration(_))));

        config.endpoints[1].default_sort = Some("favoriteAnimal".to_string());
        assert!(config.validate().is_err());

        // Animal has no email
        config.endpoints[1].default_sort = None;
        config.endpoints[2].default_sort = Some("email".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_validation() {
        let mut config = AppConfig::default_config();
        config.endpoints[2].path = "/api/users".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.endpoints[0].path = "api/users".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.endpoints[0].path = "/health".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.endpoints.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.pagination.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sqlite_backend_requires_url() {
        let mut config = AppConfig::default_config();
        config.backend.backend_type = BackendType::Sqlite;
        assert!(config.validate().is_err());

        config.backend.url = Some("sqlite:./records.db".to_string());
        assert!(config.validate().is_ok());
    }
}
