use std::sync::Arc;

use erezept_fhir::Patient;

use super::ResourceHandler;
use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::registry::StoreRegistry;

/// Handler for Patient resources.
pub struct PatientHandler {
    store: Arc<dyn ResourceStore<Patient>>,
}

impl PatientHandler {
    /// Binds to the Patient store of `registry`.
    pub fn new(registry: &StoreRegistry) -> Self {
        Self::with_store(registry.store::<Patient>())
    }

    /// Binds to an arbitrary Patient store.
    pub fn with_store(store: Arc<dyn ResourceStore<Patient>>) -> Self {
        Self { store }
    }

    /// Finds the first patient whose identifiers contain this KVNR.
    pub async fn find_by_kvnr(&self, kvnr: &str) -> StorageResult<Option<Patient>> {
        let patients = self.store.list().await?;
        Ok(patients.into_iter().find(|patient| patient.has_kvnr(kvnr)))
    }
}

impl ResourceHandler<Patient> for PatientHandler {
    fn store(&self) -> &dyn ResourceStore<Patient> {
        self.store.as_ref()
    }
}
