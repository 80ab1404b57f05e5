use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::DataBackend;
use crate::config::{AppConfig, EndpointConfig};
use crate::error::{AppError, AppResult};
use crate::models::{Animal, User};
use crate::parser::SortSpec;
use crate::query::{execute, QueryOptions, QueryParams, QueryResponse, Record, RecordSource};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn DataBackend>,
    pub config: Arc<AppConfig>,
}

/// Per-route settings, attached to each list route as an extension
#[derive(Debug, Clone, Default)]
pub struct EndpointSettings {
    pub default_sort: Option<SortSpec>,
}

impl EndpointSettings {
    pub fn with_default_sort(mut self, default_sort: SortSpec) -> Self {
        self.default_sort = Some(default_sort);
        self
    }

    pub fn from_config(endpoint: &EndpointConfig) -> AppResult<Self> {
        Ok(Self {
            default_sort: endpoint.default_sort_spec()?,
        })
    }

    /// Reject a default sort that does not resolve against the endpoint's resource
    pub fn validate_for(&self, endpoint: &EndpointConfig) -> AppResult<()> {
        match &self.default_sort {
            Some(spec) if !endpoint.resource.resolves(spec) => {
                Err(AppError::Configuration(format!(
                    "Default sort '{}' of endpoint {} does not name a sortable property",
                    spec, endpoint.path
                )))
            }
            _ => Ok(()),
        }
    }
}

async fn list<T>(
    state: &AppState,
    settings: &EndpointSettings,
    pairs: Vec<(String, String)>,
) -> AppResult<QueryResponse<T>>
where
    T: Record,
    dyn DataBackend: RecordSource<T>,
{
    let params = QueryParams::from_pairs(pairs);
    let options = QueryOptions::from_params(&params, settings.default_sort.as_ref());

    execute(
        state.backend.as_ref(),
        &options,
        state.config.pagination.default_page_size,
    )
    .await
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(settings): Extension<EndpointSettings>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<QueryResponse<User>, AppError> {
    list(&state, &settings, pairs).await
}

pub async fn list_animals(
    State(state): State<AppState>,
    Extension(settings): Extension<EndpointSettings>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<QueryResponse<Animal>, AppError> {
    list(&state, &settings, pairs).await
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.backend.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceKind;

    fn endpoint(resource: ResourceKind) -> EndpointConfig {
        EndpointConfig {
            path: "/records".to_string(),
            resource,
            default_sort: None,
        }
    }

    fn settings(raw: &str) -> EndpointSettings {
        EndpointSettings::default().with_default_sort(SortSpec::parse(Some(raw)).unwrap())
    }

    #[test]
    fn test_validate_default_sort_against_resource() {
        assert!(settings("favoriteAnimal.name desc")
            .validate_for(&endpoint(ResourceKind::Users))
            .is_ok());
        assert!(settings("name").validate_for(&endpoint(ResourceKind::Animals)).is_ok());
        assert!(EndpointSettings::default()
            .validate_for(&endpoint(ResourceKind::Animals))
            .is_ok());

        let result = settings("email").validate_for(&endpoint(ResourceKind::Animals));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
