use axum::{middleware, routing::get, Extension, Router};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::backend::DataBackend;
use crate::config::{AppConfig, ResourceKind};
use crate::error::{AppError, AppResult};
use crate::logging::logging_middleware;
use crate::resource::listing::{health, list_animals, list_users};
use crate::resource::{AppState, EndpointSettings};

/// Build the application routes from the configured endpoints
pub fn build_router(config: Arc<AppConfig>, backend: Arc<dyn DataBackend>) -> AppResult<Router> {
    build_router_with_settings(config, backend, HashMap::new())
}

/// Build the routes, replacing the configured settings of every endpoint
/// whose path is a key of `overrides`.
///
/// An override must name a configured path, and its default sort must
/// resolve against that endpoint's resource.
pub fn build_router_with_settings(
    config: Arc<AppConfig>,
    backend: Arc<dyn DataBackend>,
    mut overrides: HashMap<String, EndpointSettings>,
) -> AppResult<Router> {
    let mut app = Router::new().route("/health", get(health));

    for endpoint in &config.endpoints {
        let settings = match overrides.remove(&endpoint.path) {
            Some(settings) => {
                settings.validate_for(endpoint)?;
                settings
            }
            None => EndpointSettings::from_config(endpoint)?,
        };
        match &settings.default_sort {
            Some(spec) => info!(
                "Serving {:?} at {} (default sort: {})",
                endpoint.resource, endpoint.path, spec
            ),
            None => info!("Serving {:?} at {}", endpoint.resource, endpoint.path),
        }

        let handler = match endpoint.resource {
            ResourceKind::Users => get(list_users),
            ResourceKind::Animals => get(list_animals),
        };
        app = app.route(&endpoint.path, handler.layer(Extension(settings)));
    }

    if let Some(path) = overrides.keys().next() {
        return Err(AppError::Configuration(format!(
            "Endpoint settings given for {}, which is not a configured endpoint",
            path
        )));
    }

    let state = AppState { backend, config };

    Ok(app
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state))
}
