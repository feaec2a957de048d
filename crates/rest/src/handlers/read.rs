//! Read interaction handler.
//!
//! Implements the FHIR [read interaction](https://hl7.org/fhir/http.html#read):
//! `GET [base]/[type]/[id]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::RoutedResource;
use crate::error::{RestError, RestResult};
use crate::responses::ResourceHeaders;
use crate::state::AppState;

/// Handler for the read interaction.
///
/// # Response
///
/// - `200 OK` - the current version, with `ETag` and `Last-Modified`
/// - `404 Not Found` - OperationOutcome
pub async fn read_handler<T: RoutedResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RestResult<Response> {
    debug!(resource_type = T::RESOURCE_TYPE, id = %id, "Processing read request");

    let resource = T::handler(state.handlers())
        .read(&id)
        .await?
        .ok_or_else(|| RestError::not_found(T::RESOURCE_TYPE, &id))?;

    let headers = ResourceHeaders::for_resource(&resource);
    Ok((StatusCode::OK, headers.to_header_map(), Json(resource)).into_response())
}
