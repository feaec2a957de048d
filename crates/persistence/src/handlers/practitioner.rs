use std::sync::Arc;

use erezept_fhir::Practitioner;

use super::ResourceHandler;
use crate::core::ResourceStore;
use crate::error::StorageResult;
use crate::registry::StoreRegistry;

/// Handler for Practitioner resources.
pub struct PractitionerHandler {
    store: Arc<dyn ResourceStore<Practitioner>>,
}

impl PractitionerHandler {
    pub fn new(registry: &StoreRegistry) -> Self {
        Self::with_store(registry.store::<Practitioner>())
    }

    pub fn with_store(store: Arc<dyn ResourceStore<Practitioner>>) -> Self {
        Self { store }
    }

    /// Finds the first practitioner whose identifiers contain this LANR.
    pub async fn find_by_lanr(&self, lanr: &str) -> StorageResult<Option<Practitioner>> {
        let practitioners = self.store.list().await?;
        Ok(practitioners
            .into_iter()
            .find(|practitioner| practitioner.has_lanr(lanr)))
    }
}

impl ResourceHandler<Practitioner> for PractitionerHandler {
    fn store(&self) -> &dyn ResourceStore<Practitioner> {
        self.store.as_ref()
    }
}
