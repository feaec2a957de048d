//! Search interaction handler.
//!
//! Implements the FHIR [search interaction](https://hl7.org/fhir/http.html#search):
//! `GET [base]/[type]?params`
//!
//! Supported parameters are `_id`, `subject`/`patient` and `requester`.
//! Reference parameters match by substring; anything else is ignored.

use axum::{
    Json,
    extract::{OriginalUri, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use erezept_persistence::SearchParams;
use tracing::debug;

use super::RoutedResource;
use crate::error::{RestError, RestResult};
use crate::responses::{FHIR_JSON, SearchsetBuilder};
use crate::routing::FHIR_BASE_PATH;
use crate::state::AppState;

/// Handler for type-level search.
///
/// # Response
///
/// - `200 OK` - a `searchset` Bundle with `total` and one entry per match
pub async fn search_handler<T: RoutedResource>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<SearchParams>,
) -> RestResult<Response> {
    debug!(resource_type = T::RESOURCE_TYPE, params = ?params, "Processing search request");

    let results = T::handler(state.handlers()).search(&params).await?;
    debug!(resource_type = T::RESOURCE_TYPE, total = results.len(), "Search complete");

    let bundle = SearchsetBuilder::new(FHIR_BASE_PATH, T::RESOURCE_TYPE)
        .self_link(uri.to_string())
        .build(&results)
        .map_err(|e| RestError::InternalError {
            message: format!("Failed to build searchset: {}", e),
        })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON))],
        Json(bundle),
    )
        .into_response())
}
