//! FHIR R4 resource model for the E-Rezept demo server.
//!
//! This crate holds the strongly-typed resources exchanged by the server and
//! the traits the persistence layer needs to store them:
//!
//! - [`Patient`], [`Practitioner`], [`MedicationRequest`] and [`Bundle`] are
//!   serde structs using FHIR JSON field names. Elements without a typed field
//!   are kept in a flattened map, so no client data is lost on a round trip.
//! - [`GenericResource`] carries any other resource type.
//! - [`FhirResource`] exposes id and `meta`; [`SearchReferences`] exposes the
//!   `subject` and `requester` references used by search.
//! - [`GermanCodeSystems`] lists the identifier systems of the German
//!   healthcare system (KVNR, LANR, PZN, ...).
//!
//! # Example
//!
//! ```
//! use erezept_fhir::{FhirResource, Patient, SearchReferences};
//! use serde_json::json;
//!
//! let patient: Patient = serde_json::from_value(json!({
//!     "resourceType": "Patient",
//!     "id": "patient-1",
//!     "identifier": [{"system": "http://fhir.de/sid/gkv/kvid-10", "value": "X123456789"}],
//!     "birthDate": "1980-01-15"
//! }))
//! .unwrap();
//!
//! assert_eq!(patient.id(), Some("patient-1"));
//! assert_eq!(patient.kvnr(), Some("X123456789"));
//! assert_eq!(patient.subject_reference(), None);
//! ```

pub mod base;
pub mod bundle;
pub mod code_systems;
pub mod medication_request;
pub mod patient;
pub mod practitioner;
pub mod resource;

pub use base::{
    Address, Annotation, CodeableConcept, Coding, ContactPoint, Extension, HumanName, Identifier,
    Meta, Narrative, Period, Quantity, Range, Ratio, Reference,
};
pub use bundle::{Bundle, BundleEntry, BundleLink, BundleType};
pub use code_systems::GermanCodeSystems;
pub use medication_request::{
    DispenseRequest, Dosage, DosageDoseAndRate, InitialFill, MedicationRequest,
    MedicationRequestIntent, MedicationRequestStatus, Substitution, Timing, TimingRepeat,
};
pub use patient::{AdministrativeGender, Patient};
pub use practitioner::{Practitioner, PractitionerQualification};
pub use resource::{FhirResource, GenericResource, SearchReferences, TypedResource};

/// The FHIR version implemented by this model.
pub const FHIR_VERSION: &str = "4.0.1";
