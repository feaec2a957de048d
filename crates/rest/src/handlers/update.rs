//! Update interaction handler.
//!
//! Implements the FHIR [update interaction](https://hl7.org/fhir/http.html#update):
//! `PUT [base]/[type]/[id]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{RoutedResource, parse_body};
use crate::error::{RestError, RestResult};
use crate::extractors::FhirResource;
use crate::responses::ResourceHeaders;
use crate::state::AppState;

/// Handler for the update interaction.
///
/// Only existing resources can be updated. The id is taken from the URL; any
/// `id` or `meta.versionId` in the body is ignored and the version is
/// incremented.
///
/// # Response
///
/// - `200 OK` - the new version
/// - `400 Bad Request` - malformed body, or `resourceType` differs from the URL
/// - `404 Not Found` - no resource with this id
pub async fn update_handler<T: RoutedResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FhirResource(body): FhirResource,
) -> RestResult<Response> {
    debug!(resource_type = T::RESOURCE_TYPE, id = %id, "Processing update request");

    let resource: T = parse_body(body)?;
    let updated = T::handler(state.handlers())
        .update(&id, resource)
        .await?
        .ok_or_else(|| RestError::not_found(T::RESOURCE_TYPE, &id))?;

    debug!(
        resource_type = T::RESOURCE_TYPE,
        id = %id,
        version = updated.version_id().unwrap_or_default(),
        "Resource updated"
    );

    let headers = ResourceHeaders::for_resource(&updated);
    Ok((StatusCode::OK, headers.to_header_map(), Json(updated)).into_response())
}
