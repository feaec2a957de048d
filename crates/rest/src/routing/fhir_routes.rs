//! FHIR route configuration.
//!
//! Defines all routes for the FHIR RESTful API.

use axum::{
    Json, Router,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use erezept_fhir::{Bundle, MedicationRequest, Patient, Practitioner};
use tracing::debug;

use super::FHIR_BASE_PATH;
use crate::error::operation_outcome;
use crate::handlers::{self, RoutedResource};
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## Server
/// - `GET /` - Server info
/// - `GET /health` - Health check
/// - `GET /fhir/metadata` - CapabilityStatement
/// - `POST /fhir/$generate-prescription-id` - New prescription id
///
/// ## Per resource type (Patient, Practitioner, MedicationRequest, Bundle)
/// - `GET /fhir/{type}` - Search
/// - `POST /fhir/{type}` - Create
/// - `GET /fhir/{type}/{id}` - Read
/// - `PUT /fhir/{type}/{id}` - Update
/// - `DELETE /fhir/{type}/{id}` - Delete
///
/// ## Instance operations
/// - `POST /fhir/MedicationRequest/{id}/$prescription-bundle` - Prescription bundle
///
/// Any other path answers 404 with an OperationOutcome.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route(
            &format!("{}/metadata", FHIR_BASE_PATH),
            get(handlers::capabilities_handler),
        )
        .route(
            &format!("{}/$generate-prescription-id", FHIR_BASE_PATH),
            post(handlers::generate_prescription_id_handler),
        )
        .route(
            &format!("{}/MedicationRequest/{{id}}/$prescription-bundle", FHIR_BASE_PATH),
            post(handlers::prescription_bundle_handler),
        )
        .merge(resource_routes::<Patient>())
        .merge(resource_routes::<Practitioner>())
        .merge(resource_routes::<MedicationRequest>())
        .merge(resource_routes::<Bundle>())
        .fallback(fallback_handler)
        .with_state(state)
}

/// Type- and instance-level routes for one resource type.
fn resource_routes<T: RoutedResource>() -> Router<AppState> {
    let type_path = format!("{}/{}", FHIR_BASE_PATH, T::RESOURCE_TYPE);
    let instance_path = format!("{}/{{id}}", type_path);

    Router::new()
        .route(
            &type_path,
            get(handlers::search_handler::<T>).post(handlers::create_handler::<T>),
        )
        .route(
            &instance_path,
            get(handlers::read_handler::<T>)
                .put(handlers::update_handler::<T>)
                .delete(handlers::delete_handler::<T>),
        )
}

async fn fallback_handler(method: Method, uri: Uri) -> impl IntoResponse {
    debug!(method = %method, path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(operation_outcome(
            "error",
            "not-found",
            &format!("No route for {} {}", method, uri.path()),
        )),
    )
}
