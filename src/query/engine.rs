use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::ordering::OrderBy;
use super::property::Record;
use super::source::{RecordQuery, RecordSource};
use crate::error::AppResult;
use crate::models::PaginationResult;
use crate::parser::{PaginationRequest, SortSpec};

/// Query string parameters with case-insensitive names.
///
/// When a name is repeated the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values
                .entry(key.as_ref().to_lowercase())
                .or_insert_with(|| value.into());
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// What a single list request asked for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub sort: Option<SortSpec>,
    pub pagination: Option<PaginationRequest>,
}

impl QueryOptions {
    /// A client `sort` replaces `default_sort` entirely, even when the client
    /// path later fails to resolve.
    pub fn from_params(params: &QueryParams, default_sort: Option<&SortSpec>) -> Self {
        let sort = SortSpec::parse(params.get("sort")).or_else(|| default_sort.cloned());
        let pagination = PaginationRequest::parse(params.get("page"), params.get("pageSize"));

        Self { sort, pagination }
    }
}

/// Response body: a plain array, or the envelope once pagination was requested
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum QueryResponse<T> {
    Plain(Vec<T>),
    Paginated(PaginationResult<T>),
}

impl<T> QueryResponse<T> {
    pub fn into_data(self) -> Vec<T> {
        match self {
            QueryResponse::Plain(data) => data,
            QueryResponse::Paginated(result) => result.data,
        }
    }
}

impl<T: Serialize> IntoResponse for QueryResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Resolve, order, and optionally paginate `source` according to `options`.
pub async fn execute<T, S>(
    source: &S,
    options: &QueryOptions,
    default_page_size: usize,
) -> AppResult<QueryResponse<T>>
where
    T: Record,
    S: RecordSource<T> + ?Sized,
{
    let mut query = RecordQuery::new();

    if let Some(spec) = &options.sort {
        match OrderBy::resolve(spec) {
            Some(order_by) => {
                debug!("Ordering by {} ({:?})", order_by.property.name(), order_by.order);
                query = query.order_by(order_by);
            }
            None => debug!("Ignoring unresolvable sort '{}'", spec),
        }
    }

    let Some(request) = options.pagination else {
        let data = source.materialize(&query).await?;
        return Ok(QueryResponse::Plain(data));
    };

    let window = request.window(default_page_size);
    debug!(
        "Paginating page {} of size {} (skip {})",
        window.page, window.page_size, window.skip
    );

    let total_count = source.count(&query).await?;
    let data = source
        .materialize(&query.slice(window.skip, window.take))
        .await?;

    Ok(QueryResponse::Paginated(PaginationResult {
        page: window.page,
        page_size: window.page_size,
        total_count,
        data,
    }))
}
