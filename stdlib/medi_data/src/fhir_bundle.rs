use serde_json::Value as JsonValue;

use crate::fhir::{FHIRObservation, FHIRPatient};
use crate::fhir_any::FHIRAny;

/// The Patient and Observation resources of a FHIR Bundle, in entry order.
///
/// Other resource types (Encounter, Condition, ...) are skipped while decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FHIRBundle {
    pub entries: Vec<FHIRAny>,
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("bundle is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FHIR Bundle object with an `entry` array")]
    NotABundle,
}

impl FHIRBundle {
    pub fn push_entry(&mut self, entry: FHIRAny) {
        log::trace!("bundle: {}", entry.reference());
        self.entries.push(entry);
    }

    pub fn from_json(s: &str) -> Result<Self, BundleError> {
        let value: JsonValue = serde_json::from_str(s)?;
        Self::from_value(&value)
    }

    /// Decode `{"entry": [{"resource": {...}}, ...]}`.
    ///
    /// Entries without a `resource` or `resourceType`, and Patient resources
    /// without an `id`, are skipped. A Bundle with no `entry` key is empty.
    pub fn from_value(value: &JsonValue) -> Result<Self, BundleError> {
        let entries = match value.get("entry") {
            Some(JsonValue::Array(entries)) => entries.as_slice(),
            None if value.get("resourceType").and_then(JsonValue::as_str) == Some("Bundle") => {
                &[][..]
            }
            _ => return Err(BundleError::NotABundle),
        };

        let mut bundle = FHIRBundle::default();
        for (idx, entry) in entries.iter().enumerate() {
            let Some(resource) = entry.get("resource") else {
                log::trace!("bundle entry {idx}: no resource, skipped");
                continue;
            };
            match resource.get("resourceType").and_then(JsonValue::as_str) {
                Some("Patient") => match FHIRPatient::from_resource(resource) {
                    Some(p) => bundle.push_entry(FHIRAny::Patient(p)),
                    None => log::trace!("bundle entry {idx}: Patient without id, skipped"),
                },
                Some("Observation") => bundle.push_entry(FHIRAny::Observation(
                    FHIRObservation::from_resource(resource),
                )),
                Some(other) => log::trace!("bundle entry {idx}: {other} ignored"),
                None => log::trace!("bundle entry {idx}: no resourceType, skipped"),
            }
        }
        Ok(bundle)
    }

    pub fn extract_patients(&self) -> Vec<&FHIRPatient> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                FHIRAny::Patient(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}
