//! E-Rezept Persistence Layer
//!
//! This crate stores the FHIR resources of the E-Rezept demo server in memory
//! and applies the per-resource rules on top of the stores.
//!
//! # Architecture
//!
//! - [`core`] - The [`ResourceStore`] trait: CRUD, search and versioning for one resource type
//! - [`backends`] - Store implementations ([`backends::memory::InMemoryStore`])
//! - [`registry`] - [`StoreRegistry`]: one store per resource type, created on first use
//! - [`handlers`] - Per-resource handlers applying defaults and domain lookups
//! - [`types`] - Search parameters and criteria
//! - [`error`] - Error types for all operations
//!
//! Control flows downwards only: handlers use the registry, the registry owns
//! the stores.
//!
//! # Identity and Versioning
//!
//! A resource created without an id gets `<millis since epoch>-<counter>`.
//! `meta.versionId` starts at `"1"` and is incremented by one on every update;
//! `meta.lastUpdated` is the instant of the last write. A missing resource is
//! not an error: lookups return `None`, deletes return `false`.
//!
//! # Quick Start
//!
//! ```ignore
//! use erezept_fhir::{MedicationRequest, MedicationRequestStatus, Reference};
//! use erezept_persistence::handlers::{ResourceHandler, ResourceHandlers};
//! use erezept_persistence::StoreRegistry;
//!
//! let registry = StoreRegistry::new();
//! let handlers = ResourceHandlers::new(&registry);
//!
//! let request = handlers
//!     .medication_requests
//!     .create(MedicationRequest {
//!         subject: Some(Reference::to("Patient", "123")),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(request.status, Some(MedicationRequestStatus::Active));
//!
//! let found = handlers.medication_requests.find_by_patient("123").await?;
//! assert_eq!(found.len(), 1);
//! ```
//!
//! # Search
//!
//! Stores understand `_id` (exact match), `subject`/`patient` and `requester`
//! (substring of the reference). All recognized parameters must match; other
//! parameters are ignored.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{SearchCriteria, SearchCriterion, SearchParams};

// Re-export core traits
pub use core::ResourceStore;

pub use handlers::{ResourceHandler, ResourceHandlers};
pub use registry::{RegisteredResource, ResourceKind, StoreHandle, StoreRegistry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
