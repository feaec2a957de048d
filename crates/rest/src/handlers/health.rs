//! Health check and server info endpoints.

use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use erezept_fhir::FHIR_VERSION;
use serde_json::{Value, json};
use tracing::debug;

use super::capabilities::SOFTWARE_NAME;
use crate::routing::FHIR_BASE_PATH;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    debug!("Processing health check request");

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "backend": state.backend_name()
    }))
}

/// Handler for `GET /`: server name, version and entry points.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": SOFTWARE_NAME,
        "version": crate::VERSION,
        "fhir": {
            "version": FHIR_VERSION,
            "endpoint": FHIR_BASE_PATH,
            "metadata": format!("{}/metadata", FHIR_BASE_PATH)
        },
        "links": {
            "patients": format!("{}/Patient", FHIR_BASE_PATH),
            "practitioners": format!("{}/Practitioner", FHIR_BASE_PATH),
            "prescriptions": format!("{}/MedicationRequest", FHIR_BASE_PATH),
            "bundles": format!("{}/Bundle", FHIR_BASE_PATH)
        }
    }))
}
