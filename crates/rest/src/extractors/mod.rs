//! Request extractors.

pub mod fhir_resource;

pub use fhir_resource::{FhirResource, FhirResourceRejection};
