//! Naming and code systems used by German e-prescriptions.

/// System URIs for identifiers and codes issued in the German healthcare system.
pub struct GermanCodeSystems;

impl GermanCodeSystems {
    /// Pharmazentralnummer.
    pub const PZN: &'static str = "http://fhir.de/CodeSystem/ifa/pzn";
    /// Krankenversichertennummer (statutory health insurance).
    pub const KVNR: &'static str = "http://fhir.de/sid/gkv/kvid-10";
    /// Lebenslange Arztnummer.
    pub const LANR: &'static str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_ANR";
    /// Zahnarztnummer.
    pub const ZANR: &'static str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_ZANR";
    /// Institutionskennzeichen.
    pub const IK: &'static str = "http://fhir.de/sid/arge-ik/iknr";
    pub const PRESCRIPTION_ID: &'static str =
        "https://gematik.de/fhir/erp/NamingSystem/GEM_ERP_NS_PrescriptionId";
    pub const ACCESS_CODE: &'static str =
        "https://gematik.de/fhir/erp/NamingSystem/GEM_ERP_NS_AccessCode";
}
