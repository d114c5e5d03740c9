use chrono::NaiveDate;
use medi_data::sanitize::{parse_calendar_date, trim_patient_names};
use medi_data::FHIRPatient;

#[test]
fn sanitize_names_and_birth_date() {
    let mut p = FHIRPatient {
        id: "p1".into(),
        given_name: Some("  Ada ".into()),
        family_name: Some("  Lovelace  ".into()),
        birth_date: Some("18151210".into()),
        gender: None,
    };
    trim_patient_names(&mut p);
    assert_eq!(p.given_name.as_deref(), Some("Ada"));
    assert_eq!(p.family_name.as_deref(), Some("Lovelace"));
    assert_eq!(p.birth_date(), NaiveDate::from_ymd_opt(1815, 12, 10));
    assert_eq!(parse_calendar_date("1815-12-10"), p.birth_date());
}
