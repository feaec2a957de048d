//! Route configuration for the FHIR REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod fhir_routes;

pub use fhir_routes::create_routes;

/// Path prefix of all FHIR endpoints.
pub const FHIR_BASE_PATH: &str = "/fhir";

/// Resource types with REST routes, in CapabilityStatement order.
pub const ROUTED_RESOURCE_TYPES: [&str; 4] =
    ["Patient", "Practitioner", "MedicationRequest", "Bundle"];
