//! FHIR Practitioner: a healthcare professional.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::{Address, CodeableConcept, ContactPoint, Date, HumanName, Identifier, Meta, Period, Reference};
use crate::code_systems::GermanCodeSystems;
use crate::patient::AdministrativeGender;
use crate::resource::{SearchReferences, typed_resource};

/// A qualification, certification or licence of the practitioner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PractitionerQualification {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    pub code: CodeableConcept,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Reference>,
}

/// FHIR Practitioner resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(default = "Practitioner::default_resource_type")]
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualification: Vec<PractitionerQualification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub communication: Vec<CodeableConcept>,
    /// Elements without a typed field (text, extension, photo, ...).
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

typed_resource!(Practitioner);

impl SearchReferences for Practitioner {}

impl Practitioner {
    /// The lebenslange Arztnummer (LANR), if the practitioner carries one.
    pub fn lanr(&self) -> Option<&str> {
        self.identifier
            .iter()
            .find(|identifier| identifier.system.as_deref() == Some(GermanCodeSystems::LANR))
            .and_then(|identifier| identifier.value.as_deref())
    }

    /// True if an identifier has the LANR system and exactly this value.
    pub fn has_lanr(&self, lanr: &str) -> bool {
        self.identifier
            .iter()
            .any(|identifier| identifier.matches(GermanCodeSystems::LANR, lanr))
    }
}
