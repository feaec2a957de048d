//! REST API tests.
//!
//! Covers the CRUD interactions, search, headers, error responses and the
//! server endpoints (`/`, `/health`, `/fhir/metadata`).

mod common;

use axum::http::StatusCode;
use common::harness::{RestTestHarness, assert_operation_outcome};
use erezept_fhir::{Patient, Reference};
use erezept_persistence::ResourceStore;
use serde_json::{Value, json};

// =============================================================================
// Create
// =============================================================================

/// Create assigns an id and returns 201 with Location and ETag.
#[tokio::test]
async fn test_create_returns_201_with_location() {
    let harness = RestTestHarness::new();

    let response = harness
        .post(
            "/fhir/Patient",
            json!({
                "resourceType": "Patient",
                "name": [{"family": "Mustermann", "given": ["Max"]}]
            }),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["id"].as_str().expect("id assigned");
    assert!(!id.is_empty());
    assert_eq!(body["meta"]["versionId"], "1");
    assert!(body["meta"]["lastUpdated"].is_string());

    assert_eq!(response.header("location"), format!("/fhir/Patient/{}", id).as_str());
    assert_eq!(response.header("etag"), "W/\"1\"");
    assert_eq!(response.header("content-type"), "application/fhir+json");
}

/// A body without resourceType is accepted; the route supplies the type.
#[tokio::test]
async fn test_create_without_resource_type() {
    let harness = RestTestHarness::new();

    let response = harness
        .post("/fhir/Practitioner", json!({"name": [{"family": "Schmidt"}]}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["resourceType"], "Practitioner");
}

/// A client-supplied id is kept.
#[tokio::test]
async fn test_create_with_explicit_id() {
    let harness = RestTestHarness::new();

    let response = harness
        .post("/fhir/Patient", json!({"resourceType": "Patient", "id": "p-explicit"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("location"), "/fhir/Patient/p-explicit");
    harness.get("/fhir/Patient/p-explicit").await.assert_status_ok();
}

/// MedicationRequest defaults are applied on create.
#[tokio::test]
async fn test_create_medication_request_defaults() {
    let harness = RestTestHarness::new();

    let response = harness
        .post(
            "/fhir/MedicationRequest",
            json!({"subject": {"reference": "Patient/p1"}}),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "active");
    assert_eq!(body["intent"], "order");
    assert_eq!(body["authoredOn"].as_str().map(str::len), Some(10));
}

/// Creating a Bundle fills in the timestamp.
#[tokio::test]
async fn test_create_bundle_sets_timestamp() {
    let harness = RestTestHarness::new();

    let response = harness
        .post("/fhir/Bundle", json!({"resourceType": "Bundle", "type": "collection"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["timestamp"].is_string());
}

/// Unmodelled elements survive the round trip.
#[tokio::test]
async fn test_create_keeps_unmodelled_elements() {
    let harness = RestTestHarness::new();

    let response = harness
        .post(
            "/fhir/Patient",
            json!({
                "resourceType": "Patient",
                "id": "p-ext",
                "extension": [{"url": "http://example.org/ext", "valueString": "x"}],
                "deceasedBoolean": false
            }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = harness.get("/fhir/Patient/p-ext").await.json();
    assert_eq!(body["extension"][0]["valueString"], "x");
    assert_eq!(body["deceasedBoolean"], false);
}

// =============================================================================
// Read
// =============================================================================

/// Read returns the stored resource with ETag and Last-Modified.
#[tokio::test]
async fn test_read_returns_200() {
    let harness = RestTestHarness::new();
    let created = harness.seed_patient("p1", "X123456789").await;

    let response = harness.get("/fhir/Patient/p1").await;

    response.assert_status_ok();
    let body: Patient = response.json();
    assert_eq!(body, created);
    assert_eq!(response.header("etag"), "W/\"1\"");
    assert!(response.maybe_header("last-modified").is_some());
}

/// Reading an unknown id yields a not-found OperationOutcome.
#[tokio::test]
async fn test_read_not_found_returns_404() {
    let harness = RestTestHarness::new();

    let response = harness.get("/fhir/Patient/nonexistent").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = assert_operation_outcome(&response, "not-found");
    assert_eq!(body["issue"][0]["diagnostics"], "Patient/nonexistent not found");
}

/// Stores are per type: a Patient id is unknown to Practitioner.
#[tokio::test]
async fn test_read_is_scoped_to_type() {
    let harness = RestTestHarness::new();
    harness.seed_patient("shared-id", "X123456789").await;

    harness
        .get("/fhir/Practitioner/shared-id")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Update
// =============================================================================

/// Update increments the version and ignores the client's versionId.
#[tokio::test]
async fn test_update_increments_version() {
    let harness = RestTestHarness::new();
    harness.seed_patient("p1", "X123456789").await;

    let response = harness
        .put(
            "/fhir/Patient/p1",
            json!({
                "resourceType": "Patient",
                "id": "p1",
                "meta": {"versionId": "42"},
                "gender": "female"
            }),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["meta"]["versionId"], "2");
    assert_eq!(body["gender"], "female");
    assert_eq!(response.header("etag"), "W/\"2\"");

    let second: Value = harness
        .put("/fhir/Patient/p1", json!({"gender": "male"}))
        .await
        .json();
    assert_eq!(second["meta"]["versionId"], "3");
    assert_eq!(second["id"], "p1");
}

/// Update does not create.
#[tokio::test]
async fn test_update_missing_returns_404() {
    let harness = RestTestHarness::new();

    let response = harness
        .put("/fhir/MedicationRequest/nope", json!({"resourceType": "MedicationRequest"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_operation_outcome(&response, "not-found");
    harness
        .get("/fhir/MedicationRequest/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// The URL id wins over an id in the body.
#[tokio::test]
async fn test_update_with_other_body_id_uses_url_id() {
    let harness = RestTestHarness::new();
    harness.seed_patient("p1", "X123456789").await;

    let response = harness
        .put(
            "/fhir/Patient/p1",
            json!({"resourceType": "Patient", "id": "other", "active": true}),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "p1");
    assert_eq!(body["meta"]["versionId"], "2");
    assert_eq!(body["active"], true);

    harness
        .get("/fhir/Patient/other")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Update applies no create defaults.
#[tokio::test]
async fn test_update_medication_request_keeps_omitted_fields_absent() {
    let harness = RestTestHarness::new();
    harness.seed_prescription("rx1", "p1", "dr1").await;

    let body: Value = harness
        .put("/fhir/MedicationRequest/rx1", json!({"subject": {"reference": "Patient/p1"}}))
        .await
        .json();

    assert!(body.get("status").is_none());
    assert!(body.get("intent").is_none());
}

// =============================================================================
// Delete
// =============================================================================

/// Delete returns 204, then the resource is gone and a second delete is 404.
#[tokio::test]
async fn test_delete_lifecycle() {
    let harness = RestTestHarness::new();
    harness.seed_practitioner("dr1", "123456789").await;

    harness
        .delete("/fhir/Practitioner/dr1")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    harness
        .get("/fhir/Practitioner/dr1")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let second = harness.delete("/fhir/Practitioner/dr1").await;
    second.assert_status(StatusCode::NOT_FOUND);
    assert_operation_outcome(&second, "not-found");
}

// =============================================================================
// Search
// =============================================================================

/// Search without parameters returns every resource of the type.
#[tokio::test]
async fn test_search_returns_searchset() {
    let harness = RestTestHarness::new();
    harness.seed_patient("p1", "X123456789").await;
    harness.seed_patient("p2", "Y987654321").await;

    let response = harness.get("/fhir/Patient").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/fhir+json");
    let body: Value = response.json();
    assert_eq!(body["resourceType"], "Bundle");
    assert_eq!(body["type"], "searchset");
    assert_eq!(body["total"], 2);
    assert_eq!(body["entry"][0]["fullUrl"], "/fhir/Patient/p1");
    assert_eq!(body["entry"][1]["fullUrl"], "/fhir/Patient/p2");
    assert_eq!(body["entry"][0]["resource"]["resourceType"], "Patient");
}

/// Reference parameters match by substring.
#[tokio::test]
async fn test_search_patient_substring() {
    let harness = RestTestHarness::new();
    harness.seed_prescription("rx1", "123", "dr1").await;
    harness.seed_prescription("rx2", "1234", "dr1").await;
    harness.seed_prescription("rx3", "999", "dr2").await;

    let body: Value = harness.get("/fhir/MedicationRequest?patient=123").await.json();
    assert_eq!(body["total"], 2);

    let body: Value = harness.get("/fhir/MedicationRequest?subject=Patient/999").await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["entry"][0]["resource"]["id"], "rx3");
}

/// Criteria combine with AND.
#[tokio::test]
async fn test_search_conjunction() {
    let harness = RestTestHarness::new();
    harness.seed_prescription("rx1", "p1", "dr1").await;
    harness.seed_prescription("rx2", "p1", "dr2").await;

    let body: Value = harness
        .get("/fhir/MedicationRequest?patient=p1&requester=dr2")
        .await
        .json();

    assert_eq!(body["total"], 1);
    assert_eq!(body["entry"][0]["resource"]["id"], "rx2");
}

/// `_id` matches exactly; unknown parameters are ignored.
#[tokio::test]
async fn test_search_id_and_unknown_params() {
    let harness = RestTestHarness::new();
    harness.seed_patient("123", "X123456789").await;
    harness.seed_patient("1234", "Y987654321").await;

    let body: Value = harness.get("/fhir/Patient?_id=123").await.json();
    assert_eq!(body["total"], 1);

    let body: Value = harness.get("/fhir/Patient?family=Muster").await.json();
    assert_eq!(body["total"], 2);
}

/// Resources without the searched reference never match.
#[tokio::test]
async fn test_search_reference_on_resource_without_references() {
    let harness = RestTestHarness::new();
    harness.seed_patient("p1", "X123456789").await;

    let body: Value = harness.get("/fhir/Patient?subject=p1").await.json();
    assert_eq!(body["total"], 0);
    assert!(body.get("entry").is_none());
}

/// The searchset carries a self link with the query.
#[tokio::test]
async fn test_search_self_link() {
    let harness = RestTestHarness::new();

    let body: Value = harness.get("/fhir/MedicationRequest?patient=p1").await.json();

    assert_eq!(body["link"][0]["relation"], "self");
    assert!(
        body["link"][0]["url"]
            .as_str()
            .unwrap()
            .ends_with("/fhir/MedicationRequest?patient=p1")
    );
}

/// Results come back in insertion order.
#[tokio::test]
async fn test_search_insertion_order() {
    let harness = RestTestHarness::new();
    for id in ["c", "a", "b"] {
        harness.seed_patient(id, "X123456789").await;
    }

    let body: Value = harness.get("/fhir/Patient").await.json();
    let ids: Vec<&str> = body["entry"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["resource"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

// =============================================================================
// Bad input
// =============================================================================

/// A resourceType that differs from the route is rejected.
#[tokio::test]
async fn test_resource_type_mismatch_returns_400() {
    let harness = RestTestHarness::new();

    let response = harness
        .post("/fhir/Patient", json!({"resourceType": "Practitioner"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = assert_operation_outcome(&response, "invalid");
    assert_eq!(
        body["issue"][0]["diagnostics"],
        "Resource type in body (Practitioner) does not match URL (Patient)"
    );
}

/// Unknown codes are shape errors.
#[tokio::test]
async fn test_unknown_code_returns_400() {
    let harness = RestTestHarness::new();

    let response = harness
        .post("/fhir/Patient", json!({"resourceType": "Patient", "gender": "m"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_operation_outcome(&response, "invalid");
    assert_eq!(harness.registry.store::<Patient>().list().await.unwrap().len(), 0);
}

/// Malformed JSON is rejected.
#[tokio::test]
async fn test_invalid_json_returns_400() {
    let harness = RestTestHarness::new();

    let response = harness
        .post_raw("/fhir/Patient", "application/fhir+json", "{not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_operation_outcome(&response, "invalid");
}

/// A JSON array is not a resource.
#[tokio::test]
async fn test_non_object_body_returns_400() {
    let harness = RestTestHarness::new();

    let response = harness.post_raw("/fhir/Patient", "application/json", "[]").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// XML is not supported.
#[tokio::test]
async fn test_xml_content_type_returns_415() {
    let harness = RestTestHarness::new();

    let response = harness
        .post_raw("/fhir/Patient", "application/fhir+xml", "<Patient/>")
        .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_operation_outcome(&response, "not-supported");
}

/// Unrouted paths answer with an OperationOutcome.
#[tokio::test]
async fn test_unknown_route_returns_404() {
    let harness = RestTestHarness::new();

    let response = harness.get("/fhir/Observation/1").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_operation_outcome(&response, "not-found");
}

// =============================================================================
// Server endpoints
// =============================================================================

/// Health reports status, timestamp and backend.
#[tokio::test]
async fn test_health() {
    let harness = RestTestHarness::new();

    let response = harness.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
    assert!(body["timestamp"].is_string());
}

/// The root endpoint describes the server.
#[tokio::test]
async fn test_root_info() {
    let harness = RestTestHarness::new();

    let body: Value = harness.get("/").await.json();

    assert_eq!(body["fhir"]["version"], "4.0.1");
    assert_eq!(body["fhir"]["endpoint"], "/fhir");
    assert_eq!(body["links"]["prescriptions"], "/fhir/MedicationRequest");
}

/// The CapabilityStatement lists the four resource types.
#[tokio::test]
async fn test_metadata() {
    let harness = RestTestHarness::new();

    let response = harness.get("/fhir/metadata").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["resourceType"], "CapabilityStatement");
    assert_eq!(body["kind"], "instance");
    assert_eq!(body["fhirVersion"], "4.0.1");
    assert_eq!(body["software"]["name"], "E-Rezept Demo FHIR Server");
    assert!(body["format"].as_array().unwrap().contains(&json!("json")));

    let types: Vec<&str> = body["rest"][0]["resource"]
        .as_array()
        .unwrap()
        .iter()
        .map(|resource| resource["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["Patient", "Practitioner", "MedicationRequest", "Bundle"]
    );

    let interactions: Vec<&str> = body["rest"][0]["resource"][0]["interaction"]
        .as_array()
        .unwrap()
        .iter()
        .map(|interaction| interaction["code"].as_str().unwrap())
        .collect();
    assert_eq!(
        interactions,
        vec!["read", "create", "update", "delete", "search-type"]
    );
}

// =============================================================================
// Shared stores
// =============================================================================

/// Resources written over HTTP are visible to the handlers and vice versa.
#[tokio::test]
async fn test_http_and_handlers_share_stores() {
    let harness = RestTestHarness::new();

    let response = harness
        .post(
            "/fhir/MedicationRequest",
            json!({"id": "rx-http", "subject": {"reference": "Patient/p9"}}),
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let found = harness
        .handlers
        .medication_requests
        .find_by_patient("p9")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].subject,
        Some(Reference {
            reference: Some("Patient/p9".to_string()),
            ..Default::default()
        })
    );
}
