//! REST API test harness.
//!
//! Provides a test server over a fresh store registry.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Bytes;
use axum_test::{TestResponse, TestServer};
use erezept_fhir::{GermanCodeSystems, Identifier, MedicationRequest, Patient, Practitioner, Reference};
use erezept_persistence::{ResourceHandler, ResourceHandlers, StoreRegistry};
use erezept_rest::{ServerConfig, create_app_with_config, seed_demo_data};
use serde_json::Value;

/// FHIR JSON media type sent with request bodies.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::new();
/// harness.seed_patient("p1", "X123456789").await;
///
/// let response = harness.get("/fhir/Patient/p1").await;
/// response.assert_status_ok();
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The registry behind the server.
    pub registry: Arc<StoreRegistry>,

    /// Handlers sharing the server's stores, for seeding and inspection.
    pub handlers: ResourceHandlers,
}

impl RestTestHarness {
    /// Creates a harness with empty stores.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let registry = Arc::new(StoreRegistry::new());
        let handlers = ResourceHandlers::new(&registry);
        let app = create_app_with_config(Arc::clone(&registry), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            registry,
            handlers,
        }
    }

    /// Creates a harness preloaded with the demo data set.
    pub async fn with_demo_data() -> Self {
        let harness = Self::new();
        seed_demo_data(&harness.handlers)
            .await
            .expect("Failed to seed demo data");
        harness
    }

    /// Seeds a patient with a KVNR.
    pub async fn seed_patient(&self, id: &str, kvnr: &str) -> Patient {
        self.handlers
            .patients
            .create(Patient {
                id: Some(id.to_string()),
                identifier: vec![Identifier::new(GermanCodeSystems::KVNR, kvnr)],
                ..Default::default()
            })
            .await
            .expect("Failed to seed patient")
    }

    /// Seeds a practitioner with a LANR.
    pub async fn seed_practitioner(&self, id: &str, lanr: &str) -> Practitioner {
        self.handlers
            .practitioners
            .create(Practitioner {
                id: Some(id.to_string()),
                identifier: vec![Identifier::new(GermanCodeSystems::LANR, lanr)],
                ..Default::default()
            })
            .await
            .expect("Failed to seed practitioner")
    }

    /// Seeds a prescription referencing a patient and a practitioner.
    pub async fn seed_prescription(
        &self,
        id: &str,
        patient_id: &str,
        practitioner_id: &str,
    ) -> MedicationRequest {
        self.handlers
            .medication_requests
            .create(MedicationRequest {
                id: Some(id.to_string()),
                subject: Some(Reference::to("Patient", patient_id)),
                requester: Some(Reference::to("Practitioner", practitioner_id)),
                ..Default::default()
            })
            .await
            .expect("Failed to seed prescription")
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }

    /// Makes a POST request with a FHIR JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.server
            .post(path)
            .bytes(json_bytes(&body))
            .content_type(FHIR_JSON)
            .await
    }

    /// Makes a POST request with a raw body and content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> TestResponse {
        self.server
            .post(path)
            .bytes(Bytes::from(body.to_string()))
            .content_type(content_type)
            .await
    }

    /// Makes a PUT request with a FHIR JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.server
            .put(path)
            .bytes(json_bytes(&body))
            .content_type(FHIR_JSON)
            .await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.server.delete(path).await
    }
}

fn json_bytes(body: &Value) -> Bytes {
    Bytes::from(serde_json::to_vec(body).expect("Failed to serialize body"))
}

/// Asserts that a response is an OperationOutcome with the given issue code.
pub fn assert_operation_outcome(response: &TestResponse, code: &str) -> Value {
    let body: Value = response.json();
    assert_eq!(body["resourceType"], "OperationOutcome");
    assert_eq!(body["issue"][0]["severity"], "error");
    assert_eq!(body["issue"][0]["code"], code);
    body
}
