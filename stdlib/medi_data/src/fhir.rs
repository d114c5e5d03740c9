use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::sanitize::parse_calendar_date;

pub trait FHIRResource {
    fn resource_type(&self) -> &'static str;
    fn id(&self) -> &str;
}

/// FHIR administrative gender. `Unknown` also covers codes this crate does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
    Unknown,
}

impl Gender {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "female" => Gender::Female,
            "male" => Gender::Male,
            "other" => Gender::Other,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FHIRPatient {
    pub id: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub birth_date: Option<String>, // YYYY-MM-DD or YYYYMMDD
    pub gender: Option<Gender>,
}

impl FHIRResource for FHIRPatient {
    fn resource_type(&self) -> &'static str {
        "Patient"
    }
    fn id(&self) -> &str {
        &self.id
    }
}

impl FHIRPatient {
    /// Decode a FHIR Patient resource.
    ///
    /// Only the first `name` entry is read: its first `given` and its `family`,
    /// which may be a string (R4) or an array (DSTU2). Returns `None` when the
    /// resource has no `id`.
    pub fn from_resource(resource: &JsonValue) -> Option<Self> {
        let id = resource.get("id").and_then(JsonValue::as_str)?.to_string();
        let name = resource.pointer("/name/0");
        let given_name = name
            .and_then(|n| n.pointer("/given/0"))
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let family_name = name
            .and_then(|n| n.get("family"))
            .and_then(|f| match f {
                JsonValue::String(s) => Some(s.as_str()),
                JsonValue::Array(parts) => parts.first().and_then(JsonValue::as_str),
                _ => None,
            })
            .map(str::to_string);
        let birth_date = resource
            .get("birthDate")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let gender = resource
            .get("gender")
            .and_then(JsonValue::as_str)
            .map(Gender::from_code);

        Some(FHIRPatient {
            id,
            given_name,
            family_name,
            birth_date,
            gender,
        })
    }

    /// "Given Family" when both name parts are present.
    pub fn display_name(&self) -> Option<String> {
        match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            _ => None,
        }
    }

    pub fn birth_date(&self) -> Option<chrono::NaiveDate> {
        self.birth_date.as_deref().and_then(parse_calendar_date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FHIRObservation {
    pub id: String,
    /// `code.text`, the display text the measurement is matched on.
    pub code: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    /// Patient id taken from `subject.reference` (`Patient/<id>`).
    pub subject: Option<String>,
}

impl FHIRResource for FHIRObservation {
    fn resource_type(&self) -> &'static str {
        "Observation"
    }
    fn id(&self) -> &str {
        &self.id
    }
}

impl FHIRObservation {
    pub fn new(code: impl Into<String>, value: f64) -> Self {
        Self {
            id: String::new(),
            code: Some(code.into()),
            value: Some(value),
            unit: None,
            subject: None,
        }
    }

    /// Decode a FHIR Observation resource. Missing or mistyped fields become `None`.
    pub fn from_resource(resource: &JsonValue) -> Self {
        let text = |ptr: &str| {
            resource
                .pointer(ptr)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        };
        let subject = resource
            .pointer("/subject/reference")
            .and_then(JsonValue::as_str)
            .map(patient_reference_id);

        FHIRObservation {
            id: text("/id").unwrap_or_default(),
            code: text("/code/text"),
            value: resource
                .pointer("/valueQuantity/value")
                .and_then(JsonValue::as_f64),
            unit: text("/valueQuantity/unit"),
            subject,
        }
    }
}

/// Patient id from a subject reference.
///
/// Accepts relative (`Patient/p1`), absolute (`http://host/fhir/Patient/p1`,
/// optionally with `/_history/n`) and `urn:uuid:` references.
pub fn patient_reference_id(reference: &str) -> String {
    let reference = reference.trim();
    if let Some(uuid) = reference.strip_prefix("urn:uuid:") {
        return uuid.to_string();
    }
    match reference.rsplit_once("Patient/") {
        Some((_, tail)) => tail.split('/').next().unwrap_or(tail).to_string(),
        None => reference.to_string(),
    }
}
