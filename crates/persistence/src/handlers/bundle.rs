use std::sync::Arc;

use erezept_fhir::{
    Bundle, BundleEntry, BundleType, FhirResource, GermanCodeSystems, Identifier,
    MedicationRequest, Patient, Practitioner,
};
use tracing::debug;

use super::{ResourceHandler, now_instant, prescription_id};
use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::registry::StoreRegistry;

/// Handler for Bundle resources, including E-Rezept document assembly.
pub struct BundleHandler {
    store: Arc<dyn ResourceStore<Bundle>>,
}

impl BundleHandler {
    pub fn new(registry: &StoreRegistry) -> Self {
        Self::with_store(registry.store::<Bundle>())
    }

    pub fn with_store(store: Arc<dyn ResourceStore<Bundle>>) -> Self {
        Self { store }
    }

    /// Assembles and stores an E-Rezept document bundle.
    ///
    /// The entries are the prescription, the patient and the practitioner, in
    /// that order, each under `urn:uuid:<id>`. The referenced resources are
    /// copied as given; nothing else is written.
    pub async fn create_prescription_bundle(
        &self,
        prescription_id: &str,
        medication_request: &MedicationRequest,
        patient: &Patient,
        practitioner: &Practitioner,
    ) -> StorageResult<Bundle> {
        let entry = vec![
            BundleEntry::new(full_url(medication_request, "medication-request"), medication_request)?,
            BundleEntry::new(full_url(patient, "patient"), patient)?,
            BundleEntry::new(full_url(practitioner, "practitioner"), practitioner)?,
        ];

        let bundle = Bundle {
            identifier: Some(Identifier::new(
                GermanCodeSystems::PRESCRIPTION_ID,
                prescription_id,
            )),
            timestamp: Some(now_instant()),
            entry,
            ..Bundle::of_type(BundleType::Document)
        };

        debug!(prescription_id, "Creating prescription bundle");
        self.create(bundle).await
    }

    /// Generates a new prescription id (`160.xxx.xxx.xxx.xxx.xx`).
    pub fn generate_prescription_id(&self) -> String {
        prescription_id::generate()
    }
}

fn full_url<R: FhirResource>(resource: &R, fallback: &str) -> String {
    format!("urn:uuid:{}", resource.assigned_id().unwrap_or(fallback))
}

impl ResourceHandler<Bundle> for BundleHandler {
    fn store(&self) -> &dyn ResourceStore<Bundle> {
        self.store.as_ref()
    }

    fn apply_create_defaults(&self, resource: &mut Bundle) {
        resource.timestamp.get_or_insert_with(now_instant);
    }
}
