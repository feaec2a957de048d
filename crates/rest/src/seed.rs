//! Demo data set.
//!
//! Two patients, two prescribing doctors and one prescription for each
//! patient. Ids are fixed so the data can be addressed directly, e.g.
//! `GET /fhir/Patient/patient-max-mustermann`.

use anyhow::{Context, Result};
use chrono::Utc;
use erezept_fhir::{
    Address, AdministrativeGender, CodeableConcept, Coding, ContactPoint, DispenseRequest, Dosage,
    GermanCodeSystems, HumanName, Identifier, MedicationRequest, MedicationRequestIntent,
    MedicationRequestStatus, Patient, Practitioner, PractitionerQualification, Quantity,
    Reference, Substitution, Timing, TimingRepeat, TypedResource,
};
use erezept_persistence::{ResourceHandler, ResourceHandlers};
use tracing::info;

const UCUM: &str = "http://unitsofmeasure.org";
const QUALIFICATION_SYSTEM: &str = "http://fhir.de/CodeSystem/qualifikation";

/// Ids of the seeded resources.
pub mod ids {
    /// Max Mustermann, KVNR X123456789.
    pub const PATIENT_MAX_MUSTERMANN: &str = "patient-max-mustermann";
    /// Erika Musterfrau, KVNR Y987654321.
    pub const PATIENT_ERIKA_MUSTERFRAU: &str = "patient-erika-musterfrau";
    /// Dr. med. Anna Schmidt, LANR 123456789.
    pub const PRACTITIONER_DR_SCHMIDT: &str = "practitioner-dr-schmidt";
    /// Dr. med. Thomas Müller, LANR 987654321.
    pub const PRACTITIONER_DR_MUELLER: &str = "practitioner-dr-mueller";
    /// Ibuprofen 400mg for Max Mustermann by Dr. Schmidt.
    pub const PRESCRIPTION_IBUPROFEN: &str = "prescription-001";
    /// Amoxicillin 500mg for Erika Musterfrau by Dr. Müller.
    pub const PRESCRIPTION_AMOXICILLIN: &str = "prescription-002";
}

/// Loads the demo data set through the resource handlers.
///
/// Seeding twice overwrites the same ids and restarts their versions at 1.
pub async fn seed_demo_data(handlers: &ResourceHandlers) -> Result<()> {
    let max = handlers
        .patients
        .create(max_mustermann())
        .await
        .context("seeding Patient/patient-max-mustermann")?;
    let erika = handlers
        .patients
        .create(erika_musterfrau())
        .await
        .context("seeding Patient/patient-erika-musterfrau")?;

    let schmidt = handlers
        .practitioners
        .create(dr_schmidt())
        .await
        .context("seeding Practitioner/practitioner-dr-schmidt")?;
    let mueller = handlers
        .practitioners
        .create(dr_mueller())
        .await
        .context("seeding Practitioner/practitioner-dr-mueller")?;

    let today = Utc::now().format("%Y-%m-%d").to_string();

    handlers
        .medication_requests
        .create(MedicationRequest {
            id: Some(ids::PRESCRIPTION_IBUPROFEN.to_string()),
            status: Some(MedicationRequestStatus::Active),
            intent: Some(MedicationRequestIntent::Order),
            medication_codeable_concept: Some(pzn("04773414", "Ibuprofen 400mg Filmtabletten")),
            subject: Some(reference_to(&max, "Max Mustermann")),
            requester: Some(reference_to(&schmidt, "Dr. med. Anna Schmidt")),
            authored_on: Some(today.clone()),
            dosage_instruction: vec![dosage("1-0-1 (morgens und abends je 1 Tablette)", 2)],
            dispense_request: Some(DispenseRequest {
                quantity: Some(ucum(20.0, "Tabletten", "{tbl}")),
                ..Default::default()
            }),
            substitution: Some(Substitution {
                allowed_boolean: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .context("seeding MedicationRequest/prescription-001")?;

    handlers
        .medication_requests
        .create(MedicationRequest {
            id: Some(ids::PRESCRIPTION_AMOXICILLIN.to_string()),
            status: Some(MedicationRequestStatus::Active),
            intent: Some(MedicationRequestIntent::Order),
            medication_codeable_concept: Some(pzn("02588457", "Amoxicillin 500mg Kapseln")),
            subject: Some(reference_to(&erika, "Erika Musterfrau")),
            requester: Some(reference_to(&mueller, "Dr. med. Thomas Müller")),
            authored_on: Some(today),
            dosage_instruction: vec![dosage("1-1-1 (dreimal täglich 1 Kapsel)", 3)],
            dispense_request: Some(DispenseRequest {
                quantity: Some(ucum(21.0, "Kapseln", "{caps}")),
                expected_supply_duration: Some(ucum(7.0, "days", "d")),
                ..Default::default()
            }),
            substitution: Some(Substitution {
                allowed_boolean: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .context("seeding MedicationRequest/prescription-002")?;

    info!(
        patients = "Max Mustermann, Erika Musterfrau",
        practitioners = "Dr. Schmidt, Dr. Müller",
        prescriptions = "Ibuprofen, Amoxicillin",
        "Demo data seeded"
    );
    Ok(())
}

fn max_mustermann() -> Patient {
    Patient {
        id: Some(ids::PATIENT_MAX_MUSTERMANN.to_string()),
        active: Some(true),
        identifier: vec![Identifier::new(GermanCodeSystems::KVNR, "X123456789")],
        name: vec![official_name("Mustermann", "Max", "Herr")],
        gender: Some(AdministrativeGender::Male),
        birth_date: Some("1985-03-15".to_string()),
        address: vec![address("home", "Musterstraße 123", "Berlin", "10115")],
        telecom: vec![
            ContactPoint {
                system: Some("phone".to_string()),
                value: Some("+49 30 123456789".to_string()),
                use_: Some("home".to_string()),
                ..Default::default()
            },
            ContactPoint {
                system: Some("email".to_string()),
                value: Some("max.mustermann@example.de".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn erika_musterfrau() -> Patient {
    Patient {
        id: Some(ids::PATIENT_ERIKA_MUSTERFRAU.to_string()),
        active: Some(true),
        identifier: vec![Identifier::new(GermanCodeSystems::KVNR, "Y987654321")],
        name: vec![official_name("Musterfrau", "Erika", "Frau")],
        gender: Some(AdministrativeGender::Female),
        birth_date: Some("1990-07-22".to_string()),
        address: vec![address("home", "Beispielweg 45", "München", "80331")],
        ..Default::default()
    }
}

fn dr_schmidt() -> Practitioner {
    Practitioner {
        id: Some(ids::PRACTITIONER_DR_SCHMIDT.to_string()),
        active: Some(true),
        identifier: vec![Identifier::new(GermanCodeSystems::LANR, "123456789")],
        name: vec![official_name("Schmidt", "Anna", "Dr. med.")],
        gender: Some(AdministrativeGender::Female),
        qualification: vec![qualification("Fachärztin für Allgemeinmedizin")],
        telecom: vec![ContactPoint {
            system: Some("phone".to_string()),
            value: Some("+49 30 987654321".to_string()),
            use_: Some("work".to_string()),
            ..Default::default()
        }],
        address: vec![address("work", "Praxisstraße 1", "Berlin", "10117")],
        ..Default::default()
    }
}

fn dr_mueller() -> Practitioner {
    Practitioner {
        id: Some(ids::PRACTITIONER_DR_MUELLER.to_string()),
        active: Some(true),
        identifier: vec![Identifier::new(GermanCodeSystems::LANR, "987654321")],
        name: vec![official_name("Müller", "Thomas", "Dr. med.")],
        gender: Some(AdministrativeGender::Male),
        qualification: vec![qualification("Facharzt für Innere Medizin")],
        ..Default::default()
    }
}

fn official_name(family: &str, given: &str, prefix: &str) -> HumanName {
    HumanName {
        use_: Some("official".to_string()),
        family: Some(family.to_string()),
        given: vec![given.to_string()],
        prefix: vec![prefix.to_string()],
        ..Default::default()
    }
}

fn address(use_: &str, line: &str, city: &str, postal_code: &str) -> Address {
    Address {
        use_: Some(use_.to_string()),
        line: vec![line.to_string()],
        city: Some(city.to_string()),
        postal_code: Some(postal_code.to_string()),
        country: Some("DE".to_string()),
        ..Default::default()
    }
}

fn qualification(display: &str) -> PractitionerQualification {
    PractitionerQualification {
        code: CodeableConcept {
            coding: vec![Coding::new(QUALIFICATION_SYSTEM, "FA", display)],
            text: None,
        },
        ..Default::default()
    }
}

fn pzn(code: &str, display: &str) -> CodeableConcept {
    CodeableConcept {
        coding: vec![Coding::new(GermanCodeSystems::PZN, code, display)],
        text: Some(display.to_string()),
    }
}

fn reference_to<T: TypedResource>(resource: &T, display: &str) -> Reference {
    Reference::to(T::RESOURCE_TYPE, resource.id().unwrap_or_default()).with_display(display)
}

fn dosage(text: &str, frequency: u32) -> Dosage {
    Dosage {
        text: Some(text.to_string()),
        timing: Some(Timing {
            repeat: Some(TimingRepeat {
                frequency: Some(frequency),
                period: Some(1.0),
                period_unit: Some("d".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ucum(value: f64, unit: &str, code: &str) -> Quantity {
    Quantity {
        value: Some(value),
        unit: Some(unit.to_string()),
        system: Some(UCUM.to_string()),
        code: Some(code.to_string()),
        ..Default::default()
    }
}
