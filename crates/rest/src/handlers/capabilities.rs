//! Capabilities (CapabilityStatement) handler.
//!
//! Implements the FHIR [capabilities interaction](https://hl7.org/fhir/http.html#capabilities):
//! `GET [base]/metadata`

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use erezept_fhir::{FHIR_VERSION, MedicationRequest, TypedResource};
use serde_json::{Value, json};
use tracing::debug;

use crate::responses::FHIR_JSON;
use crate::routing::{FHIR_BASE_PATH, ROUTED_RESOURCE_TYPES};
use crate::state::AppState;

/// Name reported in `software.name` and by the root endpoint.
pub const SOFTWARE_NAME: &str = "E-Rezept Demo FHIR Server";

/// Handler for the capabilities interaction.
///
/// Returns a CapabilityStatement listing every routed resource type with
/// its interactions and search parameters.
pub async fn capabilities_handler(State(state): State<AppState>) -> Response {
    debug!("Processing capabilities request");

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON))],
        Json(build_capability_statement(&state)),
    )
        .into_response()
}

/// Builds the CapabilityStatement for this server.
pub fn build_capability_statement(state: &AppState) -> Value {
    let resources: Vec<Value> = ROUTED_RESOURCE_TYPES
        .iter()
        .map(|resource_type| build_resource_capability(resource_type))
        .collect();

    json!({
        "resourceType": "CapabilityStatement",
        "status": "active",
        "date": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "kind": "instance",
        "software": {
            "name": SOFTWARE_NAME,
            "version": crate::VERSION
        },
        "implementation": {
            "description": format!("{} ({})", SOFTWARE_NAME, state.backend_name()),
            "url": FHIR_BASE_PATH
        },
        "fhirVersion": FHIR_VERSION,
        "format": ["json", FHIR_JSON],
        "rest": [{
            "mode": "server",
            "security": {
                "cors": state.config().enable_cors
            },
            "resource": resources,
            "operation": [
                {
                    "name": "generate-prescription-id",
                    "definition": format!("{}/$generate-prescription-id", FHIR_BASE_PATH)
                },
                {
                    "name": "prescription-bundle",
                    "definition": format!("{}/MedicationRequest/[id]/$prescription-bundle", FHIR_BASE_PATH)
                }
            ]
        }]
    })
}

/// Builds the capability entry for a resource type.
fn build_resource_capability(resource_type: &str) -> Value {
    json!({
        "type": resource_type,
        "profile": format!("http://hl7.org/fhir/StructureDefinition/{}", resource_type),
        "interaction": [
            { "code": "read" },
            { "code": "create" },
            { "code": "update" },
            { "code": "delete" },
            { "code": "search-type" }
        ],
        "versioning": "versioned",
        "readHistory": false,
        "updateCreate": false,
        "searchParam": build_search_params(resource_type)
    })
}

fn build_search_params(resource_type: &str) -> Vec<Value> {
    let mut params = vec![json!({
        "name": "_id",
        "type": "token",
        "documentation": "Logical id of this artifact"
    })];

    if resource_type == MedicationRequest::RESOURCE_TYPE {
        params.extend([
            json!({
                "name": "subject",
                "type": "reference",
                "documentation": "Subject reference contains the value"
            }),
            json!({
                "name": "patient",
                "type": "reference",
                "documentation": "Alias of subject"
            }),
            json!({
                "name": "requester",
                "type": "reference",
                "documentation": "Requester reference contains the value"
            }),
        ]);
    }

    params
}
