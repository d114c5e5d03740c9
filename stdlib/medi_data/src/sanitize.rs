use chrono::NaiveDate;

use crate::fhir::FHIRPatient;

/// Parse YYYY-MM-DD or YYYYMMDD into a calendar date.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let dashed = s.len() == 10
        && s.char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if dashed {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    }
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }
    None
}

/// Trim leading/trailing whitespace from patient given/family names.
/// Names that are blank after trimming are dropped.
pub fn trim_patient_names(p: &mut FHIRPatient) {
    fn trimmed(s: Option<String>) -> Option<String> {
        s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
    p.given_name = trimmed(p.given_name.take());
    p.family_name = trimmed(p.family_name.take());
}
