//! Resource handlers.
//!
//! A handler is a thin façade over the store of one resource type. It applies
//! the defaulting rules of its type before delegating to the store and adds
//! domain lookups (by KVNR, LANR, patient or prescriber).
//!
//! | Handler | Resource | Defaults on create |
//! |---------|----------|--------------------|
//! | [`PatientHandler`] | Patient | - |
//! | [`PractitionerHandler`] | Practitioner | - |
//! | [`MedicationRequestHandler`] | MedicationRequest | `status`, `intent`, `authoredOn` |
//! | [`BundleHandler`] | Bundle | `timestamp` |

mod bundle;
mod medication_request;
mod patient;
mod practitioner;
pub mod prescription_id;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use erezept_fhir::TypedResource;

use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::registry::StoreRegistry;
use crate::types::SearchParams;

pub use bundle::BundleHandler;
pub use medication_request::MedicationRequestHandler;
pub use patient::PatientHandler;
pub use practitioner::PractitionerHandler;

/// CRUD and search for one typed resource.
///
/// Implementors provide the store and, optionally, the defaults applied on
/// create. Updates never apply defaults.
#[async_trait]
pub trait ResourceHandler<T: TypedResource>: Send + Sync {
    /// The store this handler is bound to.
    fn store(&self) -> &dyn ResourceStore<T>;

    /// Fills in defaults before a resource is created.
    fn apply_create_defaults(&self, _resource: &mut T) {}

    /// Creates a resource.
    async fn create(&self, mut resource: T) -> StorageResult<T> {
        resource.stamp_resource_type();
        self.apply_create_defaults(&mut resource);
        self.store().create(resource).await
    }

    /// Reads a resource by id.
    async fn read(&self, id: &str) -> StorageResult<Option<T>> {
        self.store().read(id).await
    }

    /// Replaces an existing resource. `None` if there is none under `id`.
    async fn update(&self, id: &str, mut resource: T) -> StorageResult<Option<T>> {
        resource.stamp_resource_type();
        self.store().update(id, resource).await
    }

    /// Deletes a resource.
    async fn delete(&self, id: &str) -> StorageResult<bool> {
        self.store().delete(id).await
    }

    /// Searches by `_id`, `subject`/`patient` and `requester`.
    async fn search(&self, params: &SearchParams) -> StorageResult<Vec<T>> {
        self.store().search(params).await
    }
}

/// The handlers of all E-Rezept resources, bound to one registry.
#[derive(Clone)]
pub struct ResourceHandlers {
    pub patients: Arc<PatientHandler>,
    pub practitioners: Arc<PractitionerHandler>,
    pub medication_requests: Arc<MedicationRequestHandler>,
    pub bundles: Arc<BundleHandler>,
}

impl ResourceHandlers {
    /// Binds every handler to its store in `registry`.
    pub fn new(registry: &StoreRegistry) -> Self {
        Self {
            patients: Arc::new(PatientHandler::new(registry)),
            practitioners: Arc::new(PractitionerHandler::new(registry)),
            medication_requests: Arc::new(MedicationRequestHandler::new(registry)),
            bundles: Arc::new(BundleHandler::new(registry)),
        }
    }
}

/// Current time as a FHIR instant with millisecond precision.
fn now_instant() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
