use chrono::NaiveDate;
use medi_data::testdata::{bundle_json, observation_resource, patient_resource};
use medi_data::BundleSource;
use medi_risk::{compute_risk, CheckPair, ManualField, ManualInput, ProfileAssembler};
use pretty_assertions::assert_eq;

#[test]
fn prefilled_form_to_risk() {
    let json = bundle_json(vec![
        patient_resource("p1", "Aino", "Virtanen", "1964-01-15", "female"),
        observation_resource(None, "Systolic blood pressure", 140.0, "mmHg"),
        observation_resource(None, "Cholest SerPl-mCnc", 213.0, "mg/dL"),
        observation_resource(None, "HDLc SerPl-mCnc", 50.0, "mg/dL"),
    ]);
    let source = BundleSource::from_json(&json).unwrap();
    let assembler =
        ProfileAssembler::new(&source).today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let record = assembler.clinical_record("p1").unwrap();

    let mut form = ManualInput::prefilled(&record);
    let blocked = form.accept().unwrap_err();
    assert_eq!(
        blocked.messages().keys().copied().collect::<Vec<_>>(),
        vec![ManualField::Smoking, ManualField::Diabetes]
    );

    form.smoking = CheckPair::no();
    form.diabetes = CheckPair::no();
    let factors = form.accept().unwrap();
    let risk = compute_risk(&record.into_profile(factors));
    assert_eq!(
        (risk.stroke(), risk.coronary(), risk.combined()),
        (2.7, 3.0, 5.6)
    );
}

#[test]
fn prefill_of_missing_measurements_fails_range_checks() {
    let json = bundle_json(vec![patient_resource(
        "p2", "Jussi", "Korhonen", "1958-11-20", "male",
    )]);
    let source = BundleSource::from_json(&json).unwrap();
    let record = ProfileAssembler::new(&source)
        .today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .clinical_record("p2")
        .unwrap();
    let mut form = ManualInput::prefilled(&record);
    form.smoking = CheckPair::yes();
    form.diabetes = CheckPair::no();

    let report = form.validate();
    assert!(report.blocking());
    let fields: Vec<ManualField> = report.messages().into_keys().collect();
    assert_eq!(
        fields,
        vec![ManualField::BloodPressure, ManualField::Cholesterol, ManualField::Hdl]
    );
    assert!(!report.issue(ManualField::BloodPressure).unwrap().blocking);
}

#[test]
fn edited_measurements_replace_the_record() {
    let json = bundle_json(vec![
        patient_resource("p1", "Aino", "Virtanen", "1964-01-15", "female"),
        observation_resource(None, "Systolic blood pressure", 160.0, "mmHg"),
        observation_resource(None, "Cholest SerPl-mCnc", 213.0, "mg/dL"),
        observation_resource(None, "HDLc SerPl-mCnc", 50.0, "mg/dL"),
    ]);
    let source = BundleSource::from_json(&json).unwrap();
    let record = ProfileAssembler::new(&source)
        .today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .clinical_record("p1")
        .unwrap();
    assert_eq!(record.systolic_bp, 160.0);

    let mut form = ManualInput::prefilled(&record);
    form.blood_pressure = " 140 ".into();
    form.smoking = CheckPair::no();
    form.diabetes = CheckPair::no();
    let profile = form.apply(record).unwrap();
    assert_eq!(profile.systolic_bp(), 140.0);
    assert_eq!(profile.display_name(), "Aino Virtanen");
    let risk = compute_risk(&profile);
    assert_eq!(
        (risk.stroke(), risk.coronary(), risk.combined()),
        (2.7, 3.0, 5.6)
    );
}
