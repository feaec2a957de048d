//! FHIR Patient: demographics and administrative information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::{Address, CodeableConcept, ContactPoint, Date, HumanName, Identifier, Meta, Reference};
use crate::code_systems::GermanCodeSystems;
use crate::resource::{SearchReferences, typed_resource};

/// Administrative gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

/// FHIR Patient resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default = "Patient::default_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general_practitioner: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
    /// Elements without a typed field (text, extension, contact, ...).
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

typed_resource!(Patient);

impl SearchReferences for Patient {}

impl Patient {
    /// The Krankenversichertennummer (KVNR), if the patient carries one.
    pub fn kvnr(&self) -> Option<&str> {
        self.identifier
            .iter()
            .find(|identifier| identifier.system.as_deref() == Some(GermanCodeSystems::KVNR))
            .and_then(|identifier| identifier.value.as_deref())
    }

    /// True if an identifier has the KVNR system and exactly this value.
    pub fn has_kvnr(&self, kvnr: &str) -> bool {
        self.identifier
            .iter()
            .any(|identifier| identifier.matches(GermanCodeSystems::KVNR, kvnr))
    }
}
