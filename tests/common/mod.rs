use axum::Router;
use chrono::{TimeZone, Utc};
use paged_query::backend::{Backend, BackendType};
use paged_query::config::{
    AppConfig, BackendConfig, EndpointConfig, PaginationConfig, ResourceKind, ServerConfig,
};
use paged_query::models::{Animal, User};
use paged_query::router::build_router;
use paged_query::startup::initialize_backend;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestBackendType {
    Memory,
    Sqlite,
}

// Run the same test against every backend
#[allow(unused_macros)]
macro_rules! matrix_test {
    ($test_name:ident, $test_fn:ident) => {
        paste::paste! {
            #[tokio::test]
            async fn [<$test_name _memory>]() {
                $test_fn(common::TestBackendType::Memory).await;
            }

            #[tokio::test]
            async fn [<$test_name _sqlite>]() {
                $test_fn(common::TestBackendType::Sqlite).await;
            }
        }
    };
}

/// Seeded configuration with a plain users endpoint, a users endpoint sorted
/// by email by default, and an animals endpoint
#[allow(dead_code)]
pub fn create_test_app_config(backend_type: TestBackendType) -> AppConfig {
    let backend = match backend_type {
        TestBackendType::Memory => BackendConfig {
            backend_type: BackendType::Memory,
            url: None,
            max_connections: 1,
            connection_timeout: 30,
            seed: true,
        },
        TestBackendType::Sqlite => BackendConfig {
            backend_type: BackendType::Sqlite,
            url: Some("sqlite::memory:".to_string()),
            max_connections: 1,
            connection_timeout: 30,
            seed: true,
        },
    };

    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        backend,
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

/// Build the application for a configuration
#[allow(dead_code)]
pub async fn setup_test_app(config: AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let backend = initialize_backend(&config).await?;
    Ok(build_router(Arc::new(config), backend)?)
}

/// Build an unseeded application holding exactly the given users
#[allow(dead_code)]
pub async fn setup_test_app_with_users(
    backend_type: TestBackendType,
    users: Vec<User>,
) -> Result<Router, Box<dyn std::error::Error>> {
    let mut config = create_test_app_config(backend_type);
    config.backend.seed = false;

    let backend = initialize_backend(&config).await?;
    backend.insert_users(&users).await?;
    Ok(build_router(Arc::new(config), backend)?)
}

#[allow(dead_code)]
pub fn test_user(id: i64, user_name: &str) -> User {
    User {
        id,
        user_name: user_name.to_string(),
        email: format!("{}@example.com", user_name),
        registration_date: Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid date"),
        favorite_animal: Some(Animal {
            id: id % 3 + 1,
            name: ["Owl", "Cat", "Fox"][(id % 3) as usize].to_string(),
        }),
    }
}

/// Users with the given ids, named after their id
#[allow(dead_code)]
pub fn users_with_ids(ids: &[i64]) -> Vec<User> {
    ids.iter()
        .map(|id| test_user(*id, &format!("user{:02}", id)))
        .collect()
}

/// Items of a response body, whether it is a plain array or a pagination envelope
#[allow(dead_code)]
pub fn items(body: &Value) -> &Vec<Value> {
    body.as_array()
        .or_else(|| body["data"].as_array())
        .expect("response should contain a list of records")
}

#[allow(dead_code)]
pub fn ids(body: &Value) -> Vec<i64> {
    items(body)
        .iter()
        .map(|item| item["id"].as_i64().expect("id should be an integer"))
        .collect()
}

#[allow(dead_code)]
pub fn strings(body: &Value, field: &str) -> Vec<String> {
    items(body)
        .iter()
        .map(|item| {
            item[field]
                .as_str()
                .expect("field should be a string")
                .to_string()
        })
        .collect()
}

#[allow(dead_code)]
pub fn favorite_animal_names(body: &Value) -> Vec<String> {
    items(body)
        .iter()
        .map(|item| {
            item["favoriteAnimal"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

#[allow(dead_code)]
pub fn is_strictly_increasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

#[allow(dead_code)]
pub fn is_strictly_decreasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] > w[1])
}

#[allow(dead_code)]
pub fn is_non_decreasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[allow(dead_code)]
pub fn is_non_increasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] >= w[1])
}
