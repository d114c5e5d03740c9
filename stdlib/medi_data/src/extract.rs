//! First-match extraction of numeric measurements from observation records.
//!
//! Records are matched on their code display text, exactly. The first record in
//! source order that matches and carries a usable value wins; matching records
//! with a missing, non-numeric, non-finite or negative value are skipped. When
//! nothing usable matches, extraction yields [`MISSING_VALUE`].

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::fhir::FHIRObservation;

pub const SYSTOLIC_BP_CODE: &str = "Systolic blood pressure";
pub const TOTAL_CHOLESTEROL_CODE: &str = "Cholest SerPl-mCnc";
pub const HDL_CODE: &str = "HDLc SerPl-mCnc";

/// Sentinel returned when no usable matching record exists.
pub const MISSING_VALUE: f64 = 0.0;

/// Anything that exposes a measurement code and a numeric value.
pub trait ObservationLike {
    fn code_text(&self) -> Option<&str>;
    fn numeric_value(&self) -> Option<f64>;
}

impl<T: ObservationLike + ?Sized> ObservationLike for &T {
    fn code_text(&self) -> Option<&str> {
        (**self).code_text()
    }
    fn numeric_value(&self) -> Option<f64> {
        (**self).numeric_value()
    }
}

impl ObservationLike for FHIRObservation {
    fn code_text(&self) -> Option<&str> {
        self.code.as_deref()
    }
    fn numeric_value(&self) -> Option<f64> {
        self.value
    }
}

/// Raw JSON, either a bundle entry (`{"resource": {...}}`) or a bare resource.
impl ObservationLike for JsonValue {
    fn code_text(&self) -> Option<&str> {
        json_resource(self)
            .pointer("/code/text")
            .and_then(JsonValue::as_str)
    }
    fn numeric_value(&self) -> Option<f64> {
        json_resource(self)
            .pointer("/valueQuantity/value")
            .and_then(JsonValue::as_f64)
    }
}

fn json_resource(value: &JsonValue) -> &JsonValue {
    value.get("resource").unwrap_or(value)
}

/// The measurement codes used to build a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationCodes {
    pub systolic_bp: String,
    pub total_cholesterol: String,
    pub hdl: String,
}

impl Default for ObservationCodes {
    fn default() -> Self {
        Self {
            systolic_bp: SYSTOLIC_BP_CODE.to_string(),
            total_cholesterol: TOTAL_CHOLESTEROL_CODE.to_string(),
            hdl: HDL_CODE.to_string(),
        }
    }
}

/// Value of the first usable record whose code equals `code`.
pub fn first_value<R: ObservationLike>(records: &[R], code: &str) -> Option<f64> {
    for (idx, record) in records.iter().enumerate() {
        if record.code_text() != Some(code) {
            continue;
        }
        match record.numeric_value() {
            Some(v) if v.is_finite() && v >= 0.0 => return Some(v),
            Some(v) => log::trace!("record {idx} ({code}): unusable value {v}, skipped"),
            None => log::trace!("record {idx} ({code}): no numeric value, skipped"),
        }
    }
    None
}

/// Like [`first_value`], falling back to [`MISSING_VALUE`].
pub fn extract_value<R: ObservationLike>(records: &[R], code: &str) -> f64 {
    first_value(records, code).unwrap_or_else(|| {
        log::debug!("no usable `{code}` among {} records", records.len());
        MISSING_VALUE
    })
}
