//! HTTP request handlers for FHIR interactions.
//!
//! - [`read`] - Read a resource by ID
//! - [`create`] - Create a new resource
//! - [`update`] - Update an existing resource
//! - [`delete`] - Delete a resource
//! - [`search`] - Search for resources
//! - [`operations`] - E-Rezept operations (`$generate-prescription-id`, `$prescription-bundle`)
//! - [`capabilities`] - Get server capabilities (CapabilityStatement)
//! - [`health`] - Health check and server info
//!
//! The interaction handlers are generic over [`RoutedResource`], so each
//! resource type gets its own monomorphized route set.

pub mod capabilities;
pub mod create;
pub mod delete;
pub mod health;
pub mod operations;
pub mod read;
pub mod search;
pub mod update;

pub use capabilities::capabilities_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, root_handler};
pub use operations::{generate_prescription_id_handler, prescription_bundle_handler};
pub use read::read_handler;
pub use search::search_handler;
pub use update::update_handler;

use erezept_fhir::{Bundle, MedicationRequest, Patient, Practitioner, TypedResource};
use erezept_persistence::{ResourceHandler, ResourceHandlers};
use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::routing::FHIR_BASE_PATH;

/// A resource type served under `/fhir/<type>`.
pub trait RoutedResource: TypedResource {
    /// The handler responsible for this resource type.
    fn handler(handlers: &ResourceHandlers) -> &dyn ResourceHandler<Self>;
}

impl RoutedResource for Patient {
    fn handler(handlers: &ResourceHandlers) -> &dyn ResourceHandler<Self> {
        handlers.patients.as_ref()
    }
}

impl RoutedResource for Practitioner {
    fn handler(handlers: &ResourceHandlers) -> &dyn ResourceHandler<Self> {
        handlers.practitioners.as_ref()
    }
}

impl RoutedResource for MedicationRequest {
    fn handler(handlers: &ResourceHandlers) -> &dyn ResourceHandler<Self> {
        handlers.medication_requests.as_ref()
    }
}

impl RoutedResource for Bundle {
    fn handler(handlers: &ResourceHandlers) -> &dyn ResourceHandler<Self> {
        handlers.bundles.as_ref()
    }
}

/// The URL path of a resource instance, e.g. `/fhir/Patient/123`.
pub fn resource_location(resource_type: &str, id: &str) -> String {
    format!("{}/{}/{}", FHIR_BASE_PATH, resource_type, id)
}

/// Converts a request body into the route's resource type.
///
/// A `resourceType` in the body must match the route; an absent one is
/// filled in by the handler.
fn parse_body<T: TypedResource>(body: Value) -> RestResult<T> {
    if let Some(body_type) = body.get("resourceType").and_then(Value::as_str) {
        if body_type != T::RESOURCE_TYPE {
            return Err(RestError::bad_request(format!(
                "Resource type in body ({}) does not match URL ({})",
                body_type,
                T::RESOURCE_TYPE
            )));
        }
    }

    serde_json::from_value(body).map_err(|e| {
        RestError::bad_request(format!("Invalid {} resource: {}", T::RESOURCE_TYPE, e))
    })
}
