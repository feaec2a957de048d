//! FHIR Bundle: a container for a collection of resources.
//!
//! Entry resources are kept as raw JSON so a bundle can hold any resource
//! type, typed or not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::{Identifier, Instant, Meta, Uri};
use crate::code_systems::GermanCodeSystems;
use crate::resource::{FhirResource, SearchReferences, typed_resource};

/// `Bundle.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
}

/// A link relating the bundle to other pages or queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: Uri,
}

/// One entry of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    /// `search`, `request`, `response` and other entry elements.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl BundleEntry {
    /// Wraps a resource under the given full URL.
    pub fn new<R: FhirResource>(full_url: impl Into<String>, resource: &R) -> serde_json::Result<Self> {
        Ok(Self {
            full_url: Some(full_url.into()),
            resource: Some(serde_json::to_value(resource)?),
            additional: Map::new(),
        })
    }

    /// The `resourceType` of the entry resource.
    pub fn resource_type(&self) -> Option<&str> {
        self.resource.as_ref()?.get("resourceType")?.as_str()
    }
}

/// FHIR Bundle resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default = "Bundle::default_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<BundleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Instant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
    /// `signature` and any other untyped elements.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

typed_resource!(Bundle);

impl SearchReferences for Bundle {}

impl Bundle {
    /// Creates an empty bundle of the given type.
    pub fn of_type(type_: BundleType) -> Self {
        Self {
            resource_type: Self::default_resource_type(),
            type_: Some(type_),
            ..Default::default()
        }
    }

    /// The prescription id carried in `identifier`, if any.
    pub fn prescription_id(&self) -> Option<&str> {
        self.identifier
            .as_ref()
            .filter(|identifier| {
                identifier.system.as_deref()
                    == Some(GermanCodeSystems::PRESCRIPTION_ID)
            })
            .and_then(|identifier| identifier.value.as_deref())
    }
}
