//! Store registry: one resource store per resource type.
//!
//! The registry owns a store for every resource type name it has been asked
//! about. The four E-Rezept resources get a store of their typed model; any
//! other name gets a store of [`GenericResource`]. Stores are created on first
//! access and live as long as the registry.
//!
//! # Example
//!
//! ```ignore
//! use erezept_persistence::registry::StoreRegistry;
//! use serde_json::json;
//!
//! let registry = StoreRegistry::new();
//!
//! let saved = registry
//!     .save_resource(json!({"resourceType": "Patient", "id": "p1"}))
//!     .await?;
//! assert_eq!(saved["meta"]["versionId"], "1");
//!
//! let saved = registry
//!     .save_resource(json!({"resourceType": "Patient", "id": "p1", "active": true}))
//!     .await?;
//! assert_eq!(saved["meta"]["versionId"], "2");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use erezept_fhir::{
    Bundle, FhirResource, GenericResource, MedicationRequest, Patient, Practitioner,
    TypedResource,
};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::backends::memory::{self, InMemoryStore};
use crate::core::ResourceStore;
use crate::error::{StorageError, StorageResult, ValidationError};
use crate::types::SearchParams;

/// The resource types the registry knows how to store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Patient,
    Practitioner,
    MedicationRequest,
    Bundle,
    /// Any other resource type name, stored as a [`GenericResource`].
    Other(String),
}

impl ResourceKind {
    /// Maps a resource type name onto its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Patient" => ResourceKind::Patient,
            "Practitioner" => ResourceKind::Practitioner,
            "MedicationRequest" => ResourceKind::MedicationRequest,
            "Bundle" => ResourceKind::Bundle,
            other => ResourceKind::Other(other.to_string()),
        }
    }

    /// The resource type name.
    pub fn name(&self) -> &str {
        match self {
            ResourceKind::Patient => Patient::RESOURCE_TYPE,
            ResourceKind::Practitioner => Practitioner::RESOURCE_TYPE,
            ResourceKind::MedicationRequest => MedicationRequest::RESOURCE_TYPE,
            ResourceKind::Bundle => Bundle::RESOURCE_TYPE,
            ResourceKind::Other(name) => name,
        }
    }

    /// True for the resource types with a typed model.
    pub fn is_typed(&self) -> bool {
        !matches!(self, ResourceKind::Other(_))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shared handle to the store of one resource type.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Patient(Arc<InMemoryStore<Patient>>),
    Practitioner(Arc<InMemoryStore<Practitioner>>),
    MedicationRequest(Arc<InMemoryStore<MedicationRequest>>),
    Bundle(Arc<InMemoryStore<Bundle>>),
    Other(Arc<InMemoryStore<GenericResource>>),
}

/// Runs `$body` with `$store` bound to the typed store inside the handle.
macro_rules! with_store {
    ($handle:expr, $store:ident => $body:expr) => {
        match $handle {
            StoreHandle::Patient($store) => $body,
            StoreHandle::Practitioner($store) => $body,
            StoreHandle::MedicationRequest($store) => $body,
            StoreHandle::Bundle($store) => $body,
            StoreHandle::Other($store) => $body,
        }
    };
}

impl StoreHandle {
    /// Returns a human-readable name for the backing store.
    pub fn backend_name(&self) -> &'static str {
        with_store!(self, store => store.backend_name())
    }

    /// Creates or updates a resource given as JSON.
    ///
    /// Returns the stored resource and `true` if it was created.
    pub async fn save_json(&self, value: Value) -> StorageResult<(Value, bool)> {
        with_store!(self, store => save_json(store.as_ref(), value).await)
    }

    /// Reads a resource as JSON.
    pub async fn get_json(&self, id: &str) -> StorageResult<Option<Value>> {
        with_store!(self, store => match store.read(id).await? {
            Some(resource) => Ok(Some(serde_json::to_value(&resource)?)),
            None => Ok(None),
        })
    }

    /// Searches and returns the matches as JSON.
    pub async fn search_json(&self, params: &SearchParams) -> StorageResult<Vec<Value>> {
        with_store!(self, store => {
            let matches = store.search(params).await?;
            matches
                .iter()
                .map(|resource| serde_json::to_value(resource).map_err(StorageError::from))
                .collect()
        })
    }

    /// Deletes a resource.
    pub async fn delete(&self, id: &str) -> StorageResult<bool> {
        with_store!(self, store => store.delete(id).await)
    }

    /// Number of stored resources.
    pub async fn count(&self) -> StorageResult<usize> {
        with_store!(self, store => store.count().await)
    }
}

async fn save_json<T: FhirResource>(
    store: &InMemoryStore<T>,
    value: Value,
) -> StorageResult<(Value, bool)> {
    let resource_type = value
        .get("resourceType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let resource: T = serde_json::from_value(value)
        .map_err(|err| StorageError::invalid_resource(&resource_type, err))?;
    let (stored, created) = store.upsert(resource).await?;
    Ok((serde_json::to_value(&stored)?, created))
}

/// A typed resource with a dedicated [`StoreHandle`] variant.
pub trait RegisteredResource: TypedResource {
    /// Wraps a typed store into its handle variant.
    fn into_handle(store: Arc<InMemoryStore<Self>>) -> StoreHandle;

    /// The lazily created slot of this type's store.
    fn slot(stores: &TypedStores) -> &OnceLock<Arc<InMemoryStore<Self>>>;
}

/// The stores of the four typed resources, each created on first use.
#[derive(Default)]
pub struct TypedStores {
    patients: OnceLock<Arc<InMemoryStore<Patient>>>,
    practitioners: OnceLock<Arc<InMemoryStore<Practitioner>>>,
    medication_requests: OnceLock<Arc<InMemoryStore<MedicationRequest>>>,
    bundles: OnceLock<Arc<InMemoryStore<Bundle>>>,
}

impl TypedStores {
    fn created(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (self.patients.get().is_some(), Patient::RESOURCE_TYPE),
            (self.practitioners.get().is_some(), Practitioner::RESOURCE_TYPE),
            (self.medication_requests.get().is_some(), MedicationRequest::RESOURCE_TYPE),
            (self.bundles.get().is_some(), Bundle::RESOURCE_TYPE),
        ]
        .into_iter()
        .filter_map(|(created, name)| created.then_some(name))
    }
}

macro_rules! registered_resource {
    ($ty:ident, $field:ident) => {
        impl RegisteredResource for $ty {
            fn into_handle(store: Arc<InMemoryStore<Self>>) -> StoreHandle {
                StoreHandle::$ty(store)
            }

            fn slot(stores: &TypedStores) -> &OnceLock<Arc<InMemoryStore<Self>>> {
                &stores.$field
            }
        }
    };
}

registered_resource!(Patient, patients);
registered_resource!(Practitioner, practitioners);
registered_resource!(MedicationRequest, medication_requests);
registered_resource!(Bundle, bundles);

/// Owns one store per resource type name.
#[derive(Default)]
pub struct StoreRegistry {
    typed: TypedStores,
    others: RwLock<HashMap<String, Arc<InMemoryStore<GenericResource>>>>,
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

impl StoreRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store for a resource type name, creating it if needed.
    pub fn get_store(&self, resource_type: &str) -> StoreHandle {
        match ResourceKind::from_name(resource_type) {
            ResourceKind::Patient => self.handle::<Patient>(),
            ResourceKind::Practitioner => self.handle::<Practitioner>(),
            ResourceKind::MedicationRequest => self.handle::<MedicationRequest>(),
            ResourceKind::Bundle => self.handle::<Bundle>(),
            ResourceKind::Other(name) => StoreHandle::Other(self.generic_store(name)),
        }
    }

    /// Returns the typed store of one of the E-Rezept resources.
    pub fn store<T: RegisteredResource>(&self) -> Arc<InMemoryStore<T>> {
        let store = T::slot(&self.typed).get_or_init(|| {
            debug!(resource_type = T::RESOURCE_TYPE, "Creating resource store");
            Arc::default()
        });
        Arc::clone(store)
    }

    fn handle<T: RegisteredResource>(&self) -> StoreHandle {
        T::into_handle(self.store::<T>())
    }

    fn generic_store(&self, name: String) -> Arc<InMemoryStore<GenericResource>> {
        if let Some(store) = self.others.read().get(&name) {
            return Arc::clone(store);
        }

        let mut others = self.others.write();
        let store = others.entry(name).or_insert_with_key(|name| {
            debug!(resource_type = %name, "Creating resource store");
            Arc::default()
        });
        Arc::clone(store)
    }

    /// Creates or updates a resource given as JSON.
    ///
    /// If the resource carries an id that exists in its type's store, it is
    /// updated; otherwise it is created (keeping a supplied id).
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingResourceType` - If `resourceType` is absent
    /// * `ValidationError::InvalidResource` - If the JSON does not fit the model
    pub async fn save_resource(&self, resource: Value) -> StorageResult<Value> {
        Ok(self.save_resource_with_outcome(resource).await?.0)
    }

    /// Like [`save_resource`](Self::save_resource), also reporting whether the
    /// resource was created.
    pub async fn save_resource_with_outcome(&self, resource: Value) -> StorageResult<(Value, bool)> {
        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingResourceType)?
            .to_string();
        self.get_store(&resource_type).save_json(resource).await
    }

    /// Deletes a resource.
    pub async fn delete_resource(&self, resource_type: &str, id: &str) -> StorageResult<bool> {
        self.get_store(resource_type).delete(id).await
    }

    /// Searches the store of a resource type.
    pub async fn search_resources(
        &self,
        resource_type: &str,
        params: &SearchParams,
    ) -> StorageResult<Vec<Value>> {
        self.get_store(resource_type).search_json(params).await
    }

    /// Reads a resource.
    pub async fn get_resource(&self, resource_type: &str, id: &str) -> StorageResult<Option<Value>> {
        self.get_store(resource_type).get_json(id).await
    }

    /// Names of the resource types whose store has been created, sorted.
    pub fn resource_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .typed
            .created()
            .map(str::to_string)
            .chain(self.others.read().keys().cloned())
            .collect();
        names.sort();
        names
    }

    /// Returns a human-readable name for the storage backend.
    pub fn backend_name(&self) -> &'static str {
        memory::BACKEND_NAME
    }
}
