//! Tests for the in-memory resource store.
//!
//! Covers identity assignment, versioning, deletion, upsert and the
//! reference-based search semantics of the `ResourceStore` trait.

use std::collections::HashMap;
use std::sync::Arc;

use erezept_fhir::{FhirResource, Meta, MedicationRequest, Patient, Reference};
use erezept_persistence::backends::memory::InMemoryStore;
use erezept_persistence::core::ResourceStore;
use erezept_persistence::types::SearchParams;

// ============================================================================
// Helper Functions
// ============================================================================

fn create_store<T>() -> InMemoryStore<T> {
    InMemoryStore::new()
}

fn patient(id: Option<&str>) -> Patient {
    Patient {
        id: id.map(str::to_string),
        active: Some(true),
        ..Default::default()
    }
}

fn prescription(id: &str, subject: &str) -> MedicationRequest {
    MedicationRequest {
        id: Some(id.to_string()),
        subject: Some(Reference {
            reference: Some(subject.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn params(pairs: &[(&str, &str)]) -> SearchParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

fn ids<T: FhirResource>(resources: &[T]) -> Vec<String> {
    resources
        .iter()
        .filter_map(|r| r.id().map(str::to_string))
        .collect()
}

// ============================================================================
// Create / Read
// ============================================================================

/// A created resource gets an id and can be read back unchanged.
#[tokio::test]
async fn test_create_then_read_is_identical() {
    let store = create_store::<Patient>();

    let created = store.create(patient(None)).await.unwrap();
    let id = created.id().expect("id assigned").to_string();
    assert!(!id.is_empty());

    let read = store.read(&id).await.unwrap();
    assert_eq!(read, Some(created));
}

/// Generated ids have the form `<millis>-<counter>`.
#[tokio::test]
async fn test_generated_id_shape() {
    let store = create_store::<Patient>();
    let created = store.create(patient(None)).await.unwrap();
    let id = created.id().unwrap();

    let (millis, counter) = id.split_once('-').expect("dash separated");
    assert!(millis.parse::<i64>().unwrap() > 0);
    assert_eq!(counter, "1");
}

/// A supplied id is kept; an empty id is treated as absent.
#[tokio::test]
async fn test_create_keeps_supplied_id() {
    let store = create_store::<Patient>();
    let created = store.create(patient(Some("patient-1"))).await.unwrap();
    assert_eq!(created.id(), Some("patient-1"));

    let generated = store.create(patient(Some(""))).await.unwrap();
    assert_ne!(generated.id(), Some(""));
}

/// Create stamps version 1 and lastUpdated, ignoring the supplied meta.
#[tokio::test]
async fn test_create_overwrites_version() {
    let store = create_store::<Patient>();
    let mut input = patient(Some("p1"));
    input.meta = Some(Meta {
        version_id: Some("42".to_string()),
        source: Some("urn:test".to_string()),
        ..Default::default()
    });

    let created = store.create(input).await.unwrap();
    let meta = created.meta().unwrap();
    assert_eq!(meta.version_id.as_deref(), Some("1"));
    assert!(meta.last_updated.as_deref().unwrap().ends_with('Z'));
    assert_eq!(meta.source.as_deref(), Some("urn:test"));
}

/// Reading an unknown id is not an error.
#[tokio::test]
async fn test_read_missing_returns_none() {
    let store = create_store::<Patient>();
    assert_eq!(store.read("nope").await.unwrap(), None);
}

// ============================================================================
// Update
// ============================================================================

/// Each update increments the version by one, whatever the payload says.
#[tokio::test]
async fn test_version_monotonicity() {
    let store = create_store::<Patient>();
    let created = store.create(patient(Some("p1"))).await.unwrap();

    let mut current = created;
    for n in 1..=5 {
        let mut payload = current.clone();
        payload.meta_mut().version_id = Some("999".to_string());
        current = store.update("p1", payload).await.unwrap().unwrap();
        assert_eq!(current.version_id(), Some((1 + n).to_string().as_str()));
    }
}

/// Update forces the path id onto the stored resource.
#[tokio::test]
async fn test_update_forces_id() {
    let store = create_store::<Patient>();
    store.create(patient(Some("p1"))).await.unwrap();

    let updated = store
        .update("p1", patient(Some("other")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id(), Some("p1"));
    assert_eq!(store.read("other").await.unwrap(), None);
}

/// Updating a missing id creates nothing.
#[tokio::test]
async fn test_update_missing_returns_none() {
    let store = create_store::<Patient>();
    let result = store.update("ghost", patient(Some("ghost"))).await.unwrap();
    assert!(result.is_none());
    assert_eq!(store.count().await.unwrap(), 0);
}

// ============================================================================
// Delete
// ============================================================================

/// Delete returns true once, then false.
#[tokio::test]
async fn test_delete_idempotence() {
    let store = create_store::<Patient>();
    store.create(patient(Some("p1"))).await.unwrap();

    assert!(store.delete("p1").await.unwrap());
    assert_eq!(store.read("p1").await.unwrap(), None);
    assert!(!store.delete("p1").await.unwrap());
    assert!(!store.exists("p1").await.unwrap());
}

// ============================================================================
// Search
// ============================================================================

/// Reference parameters match by substring, `_id` exactly.
#[tokio::test]
async fn test_search_substring_semantics() {
    let store = create_store::<MedicationRequest>();
    store.create(prescription("a", "Patient/123")).await.unwrap();
    store.create(prescription("b", "Patient/1234")).await.unwrap();
    store.create(prescription("c", "Patient/999")).await.unwrap();

    let found = store.search(&params(&[("patient", "123")])).await.unwrap();
    assert_eq!(ids(&found), vec!["a", "b"]);

    let found = store.search(&params(&[("subject", "Patient/999")])).await.unwrap();
    assert_eq!(ids(&found), vec!["c"]);

    let found = store.search(&params(&[("_id", "123")])).await.unwrap();
    assert!(found.is_empty());
}

/// Unknown parameters are ignored; an empty query returns everything.
#[tokio::test]
async fn test_search_ignores_unknown_parameters() {
    let store = create_store::<MedicationRequest>();
    store.create(prescription("a", "Patient/1")).await.unwrap();
    store.create(prescription("b", "Patient/2")).await.unwrap();

    let all = store.search(&SearchParams::new()).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = store
        .search(&params(&[("status", "active"), ("_count", "1")]))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

/// Multiple parameters are combined with AND.
#[tokio::test]
async fn test_search_is_conjunctive() {
    let store = create_store::<MedicationRequest>();
    let mut with_requester = prescription("a", "Patient/1");
    with_requester.requester = Some(Reference::to("Practitioner", "dr1"));
    store.create(with_requester).await.unwrap();
    store.create(prescription("b", "Patient/1")).await.unwrap();

    let found = store
        .search(&params(&[("patient", "1"), ("requester", "dr1")]))
        .await
        .unwrap();
    assert_eq!(ids(&found), vec!["a"]);
}

/// Resources without a subject never match a subject search.
#[tokio::test]
async fn test_search_on_patients_by_reference_is_empty() {
    let store = create_store::<Patient>();
    store.create(patient(Some("p1"))).await.unwrap();

    let found = store.search(&params(&[("patient", "p1")])).await.unwrap();
    assert!(found.is_empty());
    let found = store.search(&params(&[("_id", "p1")])).await.unwrap();
    assert_eq!(found.len(), 1);
}

// ============================================================================
// Upsert
// ============================================================================

/// Upsert creates unknown ids and updates known ones.
#[tokio::test]
async fn test_upsert() {
    let store = create_store::<Patient>();

    let (first, created) = store.upsert(patient(Some("new-id"))).await.unwrap();
    assert!(created);
    assert_eq!(first.version_id(), Some("1"));

    let mut changed = patient(Some("new-id"));
    changed.active = Some(false);
    let (second, created) = store.upsert(changed).await.unwrap();
    assert!(!created);
    assert_eq!(second.version_id(), Some("2"));
    assert_eq!(second.active, Some(false));
    assert_eq!(store.count().await.unwrap(), 1);
}

// ============================================================================
// Concurrency
// ============================================================================

/// Concurrent updates of one resource never lose a version.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_serialized() {
    let store = Arc::new(create_store::<Patient>());
    store.create(patient(Some("p1"))).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.update("p1", patient(Some("p1"))).await.unwrap()
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_some());
    }

    let stored = store.read("p1").await.unwrap().unwrap();
    assert_eq!(stored.version_id(), Some("21"));
}

/// Concurrent creates without ids get distinct ids.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let store = Arc::new(create_store::<Patient>());

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.create(patient(None)).await.unwrap()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 50);
}
