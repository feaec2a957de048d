//! In-memory backend implementation.
//!
//! Resources live in a `HashMap` guarded by a [`parking_lot::RwLock`]. Every
//! mutating operation is a single read-modify-write under the write lock, and
//! no lock is held across an `.await`.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use erezept_fhir::FhirResource;
use parking_lot::RwLock;
use tracing::debug;

use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::types::{SearchCriteria, SearchParams};

/// Name reported by [`InMemoryStore::backend_name`](ResourceStore::backend_name).
pub const BACKEND_NAME: &str = "memory";

struct Slot<T> {
    /// Insertion sequence, used to return results in insertion order.
    seq: u64,
    resource: T,
}

struct Entries<T> {
    slots: HashMap<String, Slot<T>>,
    next_seq: u64,
}

impl<T> Entries<T> {
    fn sorted(&self) -> Vec<&Slot<T>> {
        let mut slots: Vec<&Slot<T>> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
    }
}

/// A process-local [`ResourceStore`] for one resource type.
pub struct InMemoryStore<T> {
    entries: RwLock<Entries<T>>,
    /// Suffix for generated ids. Never reset.
    id_counter: AtomicU64,
}

impl<T> Debug for InMemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("len", &self.entries.read().slots.len())
            .field("id_counter", &self.id_counter.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                slots: HashMap::new(),
                next_seq: 0,
            }),
            id_counter: AtomicU64::new(0),
        }
    }

    /// Generates `<millis since epoch>-<counter>`.
    fn generate_id(&self) -> String {
        let n = self.id_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", Utc::now().timestamp_millis(), n)
    }
}

/// Current time as a FHIR instant with millisecond precision.
fn now_instant() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored version, treating anything unparseable as 1.
fn parse_version(version: Option<&str>) -> u64 {
    version.and_then(|v| v.parse().ok()).unwrap_or(1)
}

fn stamp<T: FhirResource>(resource: &mut T, version: u64) {
    resource.stamp_resource_type();
    let meta = resource.meta_mut();
    meta.version_id = Some(version.to_string());
    meta.last_updated = Some(now_instant());
}

impl<T: FhirResource> InMemoryStore<T> {
    /// Inserts a new version 1 under the resource's id. Caller holds the lock.
    fn insert_locked(&self, entries: &mut Entries<T>, mut resource: T) -> T {
        let id = match resource.assigned_id() {
            Some(id) => id.to_string(),
            None => {
                let id = self.generate_id();
                resource.set_id(id.clone());
                id
            }
        };
        stamp(&mut resource, 1);

        // Replacing an existing id keeps its position.
        let seq = match entries.slots.get(&id) {
            Some(slot) => slot.seq,
            None => {
                entries.next_seq += 1;
                entries.next_seq
            }
        };
        entries.slots.insert(
            id,
            Slot {
                seq,
                resource: resource.clone(),
            },
        );
        resource
    }

    /// Stores the next version of an existing entry. Caller holds the lock.
    fn replace_in(slot: &mut Slot<T>, id: &str, mut resource: T) -> T {
        let version = parse_version(slot.resource.version_id()) + 1;
        resource.set_id(id.to_string());
        stamp(&mut resource, version);
        slot.resource = resource.clone();
        resource
    }
}

#[async_trait]
impl<T: FhirResource> ResourceStore<T> for InMemoryStore<T> {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn create(&self, resource: T) -> StorageResult<T> {
        let mut entries = self.entries.write();
        let created = self.insert_locked(&mut entries, resource);
        debug!(
            resource_type = created.resource_type(),
            id = created.id().unwrap_or_default(),
            "Created resource"
        );
        Ok(created)
    }

    async fn read(&self, id: &str) -> StorageResult<Option<T>> {
        let entries = self.entries.read();
        Ok(entries.slots.get(id).map(|slot| slot.resource.clone()))
    }

    async fn update(&self, id: &str, resource: T) -> StorageResult<Option<T>> {
        let mut entries = self.entries.write();
        let updated = entries
            .slots
            .get_mut(id)
            .map(|slot| Self::replace_in(slot, id, resource));
        match &updated {
            Some(resource) => debug!(
                resource_type = resource.resource_type(),
                id,
                version = resource.version_id().unwrap_or_default(),
                "Updated resource"
            ),
            None => debug!(id, "Update target not found"),
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let removed = self.entries.write().slots.remove(id).is_some();
        debug!(id, removed, "Delete");
        Ok(removed)
    }

    async fn search(&self, params: &SearchParams) -> StorageResult<Vec<T>> {
        let criteria = SearchCriteria::from_params(params);
        if !criteria.ignored().is_empty() {
            debug!(ignored = ?criteria.ignored(), "Ignoring unsupported search parameters");
        }

        let entries = self.entries.read();
        let matches: Vec<T> = entries
            .sorted()
            .into_iter()
            .filter(|slot| criteria.matches(&slot.resource))
            .map(|slot| slot.resource.clone())
            .collect();
        debug!(criteria = criteria.criteria().len(), matches = matches.len(), "Search");
        Ok(matches)
    }

    async fn list(&self) -> StorageResult<Vec<T>> {
        let entries = self.entries.read();
        Ok(entries
            .sorted()
            .into_iter()
            .map(|slot| slot.resource.clone())
            .collect())
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.entries.read().slots.len())
    }

    async fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.entries.read().slots.contains_key(id))
    }

    /// Atomic: the existence check and the write happen under one lock.
    async fn upsert(&self, resource: T) -> StorageResult<(T, bool)> {
        let mut entries = self.entries.write();
        if let Some(id) = resource.assigned_id().map(str::to_string) {
            if let Some(slot) = entries.slots.get_mut(&id) {
                return Ok((Self::replace_in(slot, &id, resource), false));
            }
        }
        Ok((self.insert_locked(&mut entries, resource), true))
    }
}
