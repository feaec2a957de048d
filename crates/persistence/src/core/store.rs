//! Core resource store trait.
//!
//! This module defines the [`ResourceStore`] trait: a keyed container for all
//! resources of one type, owning identity assignment, version stamping,
//! deletion and search.

use async_trait::async_trait;
use erezept_fhir::FhirResource;

use crate::error::StorageResult;
use crate::types::SearchParams;

/// Storage for the resources of a single resource type.
///
/// # Identity
///
/// `create` keeps a non-empty caller-supplied id and otherwise generates one.
/// Once stored, a resource keeps its id across updates.
///
/// # Versioning
///
/// `meta.versionId` is owned by the store: it is `"1"` after `create` and is
/// incremented by one on every `update`. Any version supplied by the caller is
/// ignored. `meta.lastUpdated` is set to the time of the write.
///
/// # Not Found
///
/// A missing resource is never an error: `read` and `update` return `None`
/// and `delete` returns `false`. The `Err` path is reserved for backend
/// failures.
///
/// # Example
///
/// ```ignore
/// use erezept_fhir::{FhirResource, Patient};
/// use erezept_persistence::backends::memory::InMemoryStore;
/// use erezept_persistence::core::ResourceStore;
///
/// let store = InMemoryStore::<Patient>::new();
///
/// let created = store.create(Patient::default()).await.unwrap();
/// let id = created.id().unwrap().to_string();
/// assert_eq!(created.version_id(), Some("1"));
///
/// let updated = store.update(&id, created).await.unwrap().unwrap();
/// assert_eq!(updated.version_id(), Some("2"));
///
/// assert!(store.delete(&id).await.unwrap());
/// assert!(store.read(&id).await.unwrap().is_none());
/// ```
#[async_trait]
pub trait ResourceStore<T: FhirResource>: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Creates a resource, assigning an id if none is set.
    ///
    /// An existing resource under the same id is replaced and restarts at
    /// version 1.
    async fn create(&self, resource: T) -> StorageResult<T>;

    /// Reads a resource by id.
    async fn read(&self, id: &str) -> StorageResult<Option<T>>;

    /// Replaces an existing resource.
    ///
    /// Returns `None` and stores nothing if there is no resource under `id`.
    /// The stored resource always carries `id`, whatever the payload says.
    async fn update(&self, id: &str, resource: T) -> StorageResult<Option<T>>;

    /// Deletes a resource. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> StorageResult<bool>;

    /// Returns all resources matching every recognized parameter.
    async fn search(&self, params: &SearchParams) -> StorageResult<Vec<T>>;

    /// Returns all resources.
    async fn list(&self) -> StorageResult<Vec<T>>;

    /// Number of stored resources.
    async fn count(&self) -> StorageResult<usize>;

    /// Checks if a resource exists.
    async fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.read(id).await?.is_some())
    }

    /// Creates or updates a resource keyed by its own id.
    ///
    /// Returns the stored resource and `true` if it was created. A resource
    /// without an id is always created.
    ///
    /// This default is not atomic; backends that can do better override it.
    async fn upsert(&self, resource: T) -> StorageResult<(T, bool)> {
        if let Some(id) = resource.assigned_id().map(str::to_string) {
            if let Some(updated) = self.update(&id, resource.clone()).await? {
                return Ok((updated, false));
            }
        }
        Ok((self.create(resource).await?, true))
    }
}
