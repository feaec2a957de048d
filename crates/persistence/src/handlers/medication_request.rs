use std::sync::Arc;

use chrono::Utc;
use erezept_fhir::{MedicationRequest, MedicationRequestIntent, MedicationRequestStatus};

use super::ResourceHandler;
use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::registry::StoreRegistry;
use crate::types::SearchParams;

/// Handler for MedicationRequest (prescription) resources.
///
/// On create, a missing `status` becomes `active`, a missing `intent` becomes
/// `order` and a missing `authoredOn` becomes today's UTC date.
pub struct MedicationRequestHandler {
    store: Arc<dyn ResourceStore<MedicationRequest>>,
}

impl MedicationRequestHandler {
    pub fn new(registry: &StoreRegistry) -> Self {
        Self::with_store(registry.store::<MedicationRequest>())
    }

    pub fn with_store(store: Arc<dyn ResourceStore<MedicationRequest>>) -> Self {
        Self { store }
    }

    /// Prescriptions whose subject reference contains `patient_id`.
    pub async fn find_by_patient(&self, patient_id: &str) -> StorageResult<Vec<MedicationRequest>> {
        let params = SearchParams::from([("patient".to_string(), patient_id.to_string())]);
        self.search(&params).await
    }

    /// Prescriptions whose requester reference contains `practitioner_id`.
    pub async fn find_by_prescriber(
        &self,
        practitioner_id: &str,
    ) -> StorageResult<Vec<MedicationRequest>> {
        let params = SearchParams::from([("requester".to_string(), practitioner_id.to_string())]);
        self.search(&params).await
    }
}

impl ResourceHandler<MedicationRequest> for MedicationRequestHandler {
    fn store(&self) -> &dyn ResourceStore<MedicationRequest> {
        self.store.as_ref()
    }

    fn apply_create_defaults(&self, resource: &mut MedicationRequest) {
        resource.status.get_or_insert(MedicationRequestStatus::Active);
        resource.intent.get_or_insert(MedicationRequestIntent::Order);
        resource
            .authored_on
            .get_or_insert_with(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    }
}
