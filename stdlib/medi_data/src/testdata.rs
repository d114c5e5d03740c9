//! Record factories for tests and examples.

use serde_json::{json, Value as JsonValue};

use crate::fhir::{FHIRObservation, FHIRPatient, Gender};

pub fn patient_factory(id: &str, given: &str, family: &str, dob: &str, gender: Gender) -> FHIRPatient {
    FHIRPatient {
        id: id.to_string(),
        given_name: Some(given.to_string()),
        family_name: Some(family.to_string()),
        birth_date: Some(dob.to_string()),
        gender: Some(gender),
    }
}

pub fn observation_factory(subject: &str, code: &str, value: f64, unit: &str) -> FHIRObservation {
    FHIRObservation {
        id: format!("{subject}-{}", code.to_ascii_lowercase().replace(' ', "-")),
        code: Some(code.to_string()),
        value: Some(value),
        unit: Some(unit.to_string()),
        subject: Some(subject.to_string()),
    }
}

/// FHIR JSON for a Patient resource.
pub fn patient_resource(id: &str, given: &str, family: &str, dob: &str, gender: &str) -> JsonValue {
    json!({
        "resourceType": "Patient",
        "id": id,
        "gender": gender,
        "birthDate": dob,
        "name": [{"use": "official", "given": [given], "family": family}]
    })
}

/// FHIR JSON for a quantity Observation; `subject` may be omitted as in `$everything` output.
pub fn observation_resource(subject: Option<&str>, code: &str, value: f64, unit: &str) -> JsonValue {
    let mut resource = json!({
        "resourceType": "Observation",
        "status": "final",
        "code": {"text": code},
        "valueQuantity": {"value": value, "unit": unit}
    });
    if let Some(id) = subject {
        resource["subject"] = json!({"reference": format!("Patient/{id}")});
    }
    resource
}

/// Wrap resources in a `searchset` Bundle.
pub fn bundle_json(resources: Vec<JsonValue>) -> String {
    let entries: Vec<JsonValue> = resources
        .into_iter()
        .map(|resource| json!({"resource": resource}))
        .collect();
    json!({"resourceType": "Bundle", "type": "searchset", "entry": entries}).to_string()
}
