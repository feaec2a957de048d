//! E-Rezept operations.
//!
//! - `POST [base]/$generate-prescription-id` returns a fresh prescription id
//! - `POST [base]/MedicationRequest/[id]/$prescription-bundle` assembles and
//!   stores a document Bundle for a prescription

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use erezept_fhir::{MedicationRequest, Patient, Practitioner, Reference, TypedResource};
use erezept_persistence::ResourceHandler;
use erezept_persistence::handlers::prescription_id;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::resource_location;
use crate::error::{RestError, RestResult};
use crate::responses::ResourceHeaders;
use crate::state::AppState;

/// Body of the `$generate-prescription-id` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionIdResponse {
    /// Id of the form `160.ddd.ddd.ddd.ddd.dd`.
    pub prescription_id: String,
}

/// Optional body of the `$prescription-bundle` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionBundleRequest {
    /// Prescription id to use; generated when absent.
    #[serde(default)]
    pub prescription_id: Option<String>,
}

/// Handler for `$generate-prescription-id`.
pub async fn generate_prescription_id_handler(
    State(state): State<AppState>,
) -> Json<PrescriptionIdResponse> {
    let prescription_id = state.handlers().bundles.generate_prescription_id();
    debug!(prescription_id = %prescription_id, "Generated prescription id");
    Json(PrescriptionIdResponse { prescription_id })
}

/// Handler for `$prescription-bundle`.
///
/// Resolves the prescription's `subject` Patient and `requester`
/// Practitioner and stores a document Bundle holding all three.
///
/// # Response
///
/// - `201 Created` - the stored Bundle, with `Location`
/// - `400 Bad Request` - malformed body or prescription id
/// - `404 Not Found` - no MedicationRequest with this id
/// - `422 Unprocessable Entity` - subject or requester missing or unresolvable
pub async fn prescription_bundle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> RestResult<Response> {
    debug!(id = %id, "Processing $prescription-bundle request");

    let request: PrescriptionBundleRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PrescriptionBundleRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let handlers = state.handlers();

    let prescription = handlers
        .medication_requests
        .read(&id)
        .await?
        .ok_or_else(|| RestError::not_found(MedicationRequest::RESOURCE_TYPE, &id))?;

    let patient_id = referenced_id(prescription.subject.as_ref(), Patient::RESOURCE_TYPE, "subject", &id)?;
    let practitioner_id = referenced_id(
        prescription.requester.as_ref(),
        Practitioner::RESOURCE_TYPE,
        "requester",
        &id,
    )?;

    let patient = handlers
        .patients
        .read(patient_id)
        .await?
        .ok_or_else(|| unresolved(Patient::RESOURCE_TYPE, patient_id))?;
    let practitioner = handlers
        .practitioners
        .read(practitioner_id)
        .await?
        .ok_or_else(|| unresolved(Practitioner::RESOURCE_TYPE, practitioner_id))?;

    let prescription_id = match request.prescription_id {
        Some(value) if prescription_id::is_well_formed(&value) => value,
        Some(value) => {
            return Err(RestError::bad_request(format!(
                "Malformed prescription id: {}",
                value
            )));
        }
        None => handlers.bundles.generate_prescription_id(),
    };

    let bundle = handlers
        .bundles
        .create_prescription_bundle(&prescription_id, &prescription, &patient, &practitioner)
        .await?;

    let bundle_id = bundle.id.clone().unwrap_or_default();
    info!(
        prescription = %id,
        prescription_id = %prescription_id,
        bundle = %bundle_id,
        "Prescription bundle created"
    );

    let headers = ResourceHeaders::for_resource(&bundle)
        .with_location(resource_location("Bundle", &bundle_id));
    Ok((StatusCode::CREATED, headers.to_header_map(), Json(bundle)).into_response())
}

/// The id of a literal reference to `expected_type`.
fn referenced_id<'a>(
    reference: Option<&'a Reference>,
    expected_type: &str,
    element: &str,
    prescription: &str,
) -> RestResult<&'a str> {
    match reference.and_then(Reference::split) {
        Some((resource_type, id)) if resource_type == expected_type => Ok(id),
        _ => Err(RestError::UnprocessableEntity {
            message: format!(
                "MedicationRequest/{} has no {} reference to a {}",
                prescription, element, expected_type
            ),
        }),
    }
}

fn unresolved(resource_type: &str, id: &str) -> RestError {
    RestError::UnprocessableEntity {
        message: format!("Referenced {}/{} not found", resource_type, id),
    }
}
