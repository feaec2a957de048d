//! Response formatting for the FHIR REST API.
//!
//! - [`bundle`] - searchset Bundle building
//! - [`headers`] - Response header generation (ETag, Location, etc.)

pub mod bundle;
pub mod headers;

pub use bundle::SearchsetBuilder;
pub use headers::{FHIR_JSON, ResourceHeaders};
