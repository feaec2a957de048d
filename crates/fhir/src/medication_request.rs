//! FHIR MedicationRequest: the E-Rezept prescription.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::{
    Annotation, CodeableConcept, Code, DateTime, Identifier, Meta, Period, Quantity, Range, Ratio,
    Reference,
};
use crate::resource::{SearchReferences, typed_resource};

/// `MedicationRequest.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationRequestStatus {
    Active,
    OnHold,
    Cancelled,
    Completed,
    EnteredInError,
    Stopped,
    Draft,
    Unknown,
}

/// `MedicationRequest.intent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationRequestIntent {
    Proposal,
    Plan,
    Order,
    OriginalOrder,
    ReflexOrder,
    FillerOrder,
    InstanceOrder,
    Option,
}

/// When a medication should be taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRepeat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_duration: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_unit: Option<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_unit: Option<Code>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_of_week: Vec<Code>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_of_day: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// A schedule of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<TimingRepeat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
}

/// Amount of medication per dose or per unit of time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageDoseAndRate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_ratio: Option<Ratio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_quantity: Option<Quantity>,
}

/// How the medication is to be taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dosage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_instruction: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_needed_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dose_and_rate: Vec<DosageDoseAndRate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dose_per_period: Option<Ratio>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// First fill details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialFill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Quantity>,
}

/// Medication supply authorization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispenseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_fill: Option<InitialFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispense_interval: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_supply_duration: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<Reference>,
}

/// Whether substitution (aut idem) is allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<CodeableConcept>,
}

/// FHIR MedicationRequest resource.
///
/// `status`, `intent` and `subject` are mandatory in FHIR but optional here:
/// the handler fills in defaults and the store performs no validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    #[serde(default = "MedicationRequest::default_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MedicationRequestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<MedicationRequestIntent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reason_code: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insurance: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dosage_instruction: Vec<Dosage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispense_request: Option<DispenseRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Substitution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_prescription: Option<Reference>,
    /// Elements without a typed field (text, extension, basedOn, ...).
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

typed_resource!(MedicationRequest);

impl SearchReferences for MedicationRequest {
    fn subject_reference(&self) -> Option<&str> {
        self.subject.as_ref()?.reference.as_deref()
    }

    fn requester_reference(&self) -> Option<&str> {
        self.requester.as_ref()?.reference.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::FhirResource;
    use serde_json::json;

    #[test]
    fn test_status_and_intent_codes() {
        let request: MedicationRequest = serde_json::from_value(json!({
            "status": "entered-in-error",
            "intent": "original-order"
        }))
        .unwrap();
        assert_eq!(request.status, Some(MedicationRequestStatus::EnteredInError));
        assert_eq!(request.intent, Some(MedicationRequestIntent::OriginalOrder));
        assert_eq!(request.resource_type, "MedicationRequest");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<MedicationRequest, _> =
            serde_json::from_value(json!({"status": "finished"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_search_references() {
        let request = MedicationRequest {
            subject: Some(Reference::to("Patient", "p1")),
            requester: Some(Reference::to("Practitioner", "dr1")),
            ..Default::default()
        };
        assert_eq!(request.subject_reference(), Some("Patient/p1"));
        assert_eq!(request.requester_reference(), Some("Practitioner/dr1"));
        assert_eq!(request.resource_type(), "MedicationRequest");

        let empty = MedicationRequest::default();
        assert_eq!(empty.subject_reference(), None);
    }

    #[test]
    fn test_untyped_elements_survive() {
        let input = json!({
            "resourceType": "MedicationRequest",
            "status": "active",
            "intent": "order",
            "basedOn": [{"reference": "CarePlan/cp1"}],
            "dosageInstruction": [{"text": "1-0-1", "extension": [{"url": "x", "valueBoolean": true}]}]
        });
        let request: MedicationRequest = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), input);
    }
}
