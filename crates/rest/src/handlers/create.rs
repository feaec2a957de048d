//! Create interaction handler.
//!
//! Implements the FHIR [create interaction](https://hl7.org/fhir/http.html#create):
//! `POST [base]/[type]`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{RoutedResource, parse_body, resource_location};
use crate::error::RestResult;
use crate::extractors::FhirResource;
use crate::responses::ResourceHeaders;
use crate::state::AppState;

/// Handler for the create interaction.
///
/// The server assigns an id unless the body carries one. Type defaults (for
/// example `MedicationRequest.status`) are applied by the resource handler.
///
/// # Response
///
/// - `201 Created` - with `Location` and `ETag`
/// - `400 Bad Request` - malformed body or mismatched `resourceType`
///
/// # Example
///
/// ```http
/// POST /fhir/Patient HTTP/1.1
/// Content-Type: application/fhir+json
///
/// {"resourceType": "Patient", "name": [{"family": "Mustermann"}]}
/// ```
pub async fn create_handler<T: RoutedResource>(
    State(state): State<AppState>,
    FhirResource(body): FhirResource,
) -> RestResult<Response> {
    debug!(resource_type = T::RESOURCE_TYPE, "Processing create request");

    let resource: T = parse_body(body)?;
    let created = T::handler(state.handlers()).create(resource).await?;

    let id = created.id().unwrap_or_default();
    debug!(resource_type = T::RESOURCE_TYPE, id = %id, "Resource created");

    let headers =
        ResourceHeaders::for_resource(&created).with_location(resource_location(T::RESOURCE_TYPE, id));

    Ok((StatusCode::CREATED, headers.to_header_map(), Json(created)).into_response())
}
