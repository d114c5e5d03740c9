//! Checks on the manually entered half of the calculator form.
//!
//! Every check runs on every call; a report lists all failing fields at once.
//! Only the blood pressure range check is advisory.

use std::collections::BTreeMap;
use std::fmt;

use medi_data::convert::parse_decimal;
use serde::Serialize;

use crate::profile::{ClinicalRecord, ManualFactors, PatientProfile};

pub const HDL_RANGE: (f64, f64) = (0.3, 5.0);
pub const CHOLESTEROL_RANGE: (f64, f64) = (2.0, 20.0);
pub const BLOOD_PRESSURE_RANGE: (f64, f64) = (80.0, 240.0);

const AGE_MSG: &str = "Check patient's age";
const NAME_MSG: &str = "Check patient's name";
const HDL_MSG: &str = "Check HDL cholesterol level";
const CHOLESTEROL_MSG: &str = "Check cholesterol level";
const BLOOD_PRESSURE_MSG: &str = "Check blood pressure";
const BOTH_BOXES_MSG: &str = "Check only one box";
const NO_BOX_MSG: &str = "Check one box";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualField {
    Name,
    Age,
    BloodPressure,
    Cholesterol,
    Hdl,
    Smoking,
    Diabetes,
}

impl fmt::Display for ManualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManualField::Name => "name",
            ManualField::Age => "age",
            ManualField::BloodPressure => "blood pressure",
            ManualField::Cholesterol => "cholesterol",
            ManualField::Hdl => "HDL",
            ManualField::Smoking => "smoking",
            ManualField::Diabetes => "diabetes",
        };
        f.write_str(s)
    }
}

/// A yes/no question answered with two independent check boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckPair {
    pub yes: bool,
    pub no: bool,
}

impl CheckPair {
    pub fn yes() -> Self {
        Self { yes: true, no: false }
    }

    pub fn no() -> Self {
        Self { yes: false, no: true }
    }

    /// The answer, if exactly one box is checked.
    pub fn answer(&self) -> Option<bool> {
        match (self.yes, self.no) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Format,
    Range,
    Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub kind: IssueKind,
    pub message: &'static str,
    pub blocking: bool,
}

impl FieldIssue {
    fn blocking(kind: IssueKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            blocking: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: BTreeMap<ManualField, FieldIssue>,
}

impl ValidationReport {
    /// True if any issue must stop the computation.
    pub fn blocking(&self) -> bool {
        self.issues.values().any(|i| i.blocking)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue(&self, field: ManualField) -> Option<&FieldIssue> {
        self.issues.get(&field)
    }

    pub fn messages(&self) -> BTreeMap<ManualField, &'static str> {
        self.issues.iter().map(|(f, i)| (*f, i.message)).collect()
    }

    fn record(&mut self, field: ManualField, issue: Option<FieldIssue>) {
        if let Some(issue) = issue {
            self.issues.insert(field, issue);
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, issue) in &self.issues {
            let tag = if issue.blocking { "error" } else { "warning" };
            writeln!(f, "{tag}: {field}: {}", issue.message)?;
        }
        Ok(())
    }
}

/// The manual form as typed. Text fields hold the raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManualInput {
    pub name: String,
    pub age: String,
    pub blood_pressure: String,
    pub cholesterol: String,
    pub hdl: String,
    pub smoking: CheckPair,
    pub diabetes: CheckPair,
}

impl ManualInput {
    /// The form pre-filled from a clinical record, with every box cleared.
    pub fn prefilled(record: &ClinicalRecord) -> Self {
        Self {
            name: record.display_name.clone(),
            age: record.age.to_string(),
            blood_pressure: record.systolic_bp.to_string(),
            cholesterol: record.total_cholesterol.to_string(),
            hdl: record.hdl.to_string(),
            smoking: CheckPair::default(),
            diabetes: CheckPair::default(),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        validate_manual_input(self)
    }

    /// The smoking and diabetes answers, unless the report blocks.
    pub fn accept(&self) -> Result<ManualFactors, ValidationReport> {
        let report = self.validate();
        if report.blocking() {
            return Err(report);
        }
        match (self.smoking.answer(), self.diabetes.answer()) {
            (Some(smoker), Some(diabetic)) => Ok(ManualFactors { smoker, diabetic }),
            _ => Err(report),
        }
    }

    /// Merge the accepted form into `record`: the typed name, age and
    /// measurements replace the source values, id and gender are kept.
    pub fn apply(&self, record: ClinicalRecord) -> Result<PatientProfile, ValidationReport> {
        let factors = self.accept()?;
        let parsed = (
            self.age.trim().parse::<u32>().ok(),
            parse_decimal(&self.blood_pressure),
            parse_decimal(&self.cholesterol),
            parse_decimal(&self.hdl),
        );
        let (Some(age), Some(systolic_bp), Some(total_cholesterol), Some(hdl)) = parsed else {
            return Err(self.validate());
        };
        let edited = ClinicalRecord {
            display_name: self.name.trim().to_string(),
            age,
            systolic_bp,
            total_cholesterol,
            hdl,
            ..record
        };
        Ok(edited.into_profile(factors))
    }
}

fn check_age(text: &str) -> Option<FieldIssue> {
    match text.trim().parse::<u32>() {
        Ok(_) => None,
        Err(_) => Some(FieldIssue::blocking(IssueKind::Format, AGE_MSG)),
    }
}

fn check_name(text: &str) -> Option<FieldIssue> {
    let ok = text
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '-');
    (!ok).then(|| FieldIssue::blocking(IssueKind::Format, NAME_MSG))
}

fn check_bounded(text: &str, (lo, hi): (f64, f64), message: &'static str) -> Option<FieldIssue> {
    match parse_decimal(text) {
        None => Some(FieldIssue::blocking(IssueKind::Format, message)),
        Some(v) if v < lo || v > hi => Some(FieldIssue::blocking(IssueKind::Range, message)),
        Some(_) => None,
    }
}

// Out-of-range readings only warn, unlike the cholesterol fields.
fn check_blood_pressure(text: &str) -> Option<FieldIssue> {
    let (lo, hi) = BLOOD_PRESSURE_RANGE;
    match parse_decimal(text) {
        None => Some(FieldIssue::blocking(IssueKind::Format, BLOOD_PRESSURE_MSG)),
        Some(v) if v < lo || v > hi => Some(FieldIssue {
            kind: IssueKind::Range,
            message: BLOOD_PRESSURE_MSG,
            blocking: false,
        }),
        Some(_) => None,
    }
}

fn check_pair(pair: CheckPair) -> Option<FieldIssue> {
    match (pair.yes, pair.no) {
        (true, true) => Some(FieldIssue::blocking(IssueKind::Selection, BOTH_BOXES_MSG)),
        (false, false) => Some(FieldIssue::blocking(IssueKind::Selection, NO_BOX_MSG)),
        _ => None,
    }
}

pub fn validate_manual_input(input: &ManualInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.record(ManualField::Age, check_age(&input.age));
    report.record(ManualField::Name, check_name(&input.name));
    report.record(ManualField::Hdl, check_bounded(&input.hdl, HDL_RANGE, HDL_MSG));
    report.record(
        ManualField::Cholesterol,
        check_bounded(&input.cholesterol, CHOLESTEROL_RANGE, CHOLESTEROL_MSG),
    );
    report.record(
        ManualField::BloodPressure,
        check_blood_pressure(&input.blood_pressure),
    );
    report.record(ManualField::Smoking, check_pair(input.smoking));
    report.record(ManualField::Diabetes, check_pair(input.diabetes));
    if !report.is_clean() {
        log::debug!("manual input: {} issues, blocking {}", report.issues.len(), report.blocking());
    }
    report
}
