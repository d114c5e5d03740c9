use chrono::NaiveDate;
use medi_data::testdata::{bundle_json, observation_resource, patient_resource};
use medi_data::{BundleSource, Gender, ObservationCodes};
use medi_risk::{build_profile, fetch_clinical_record, ManualFactors, ProfileAssembler, ProfileError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn aino() -> BundleSource {
    let json = bundle_json(vec![
        patient_resource("p1", "Aino", "Virtanen", "1964-03-02", "female"),
        observation_resource(None, "Systolic blood pressure", 141.0, "mmHg"),
        observation_resource(None, "Cholest SerPl-mCnc", 213.0, "mg/dL"),
        observation_resource(None, "HDLc SerPl-mCnc", 50.0, "mg/dL"),
        observation_resource(None, "Systolic blood pressure", 120.0, "mmHg"),
    ]);
    BundleSource::from_json(&json).unwrap()
}

#[test]
fn record_is_normalized() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = aino();
    let record = ProfileAssembler::new(&source)
        .today(today())
        .clinical_record("p1")
        .unwrap();
    assert_eq!(record.display_name, "Aino Virtanen");
    assert_eq!(record.gender, Gender::Female);
    assert_eq!(record.age, 59);
    // First match wins.
    assert_eq!(record.systolic_bp, 141.0);
    assert_eq!(record.total_cholesterol, 5.5);
    assert_eq!(record.hdl, 1.3);
}

#[test]
fn manual_factors_are_merged() {
    let source = aino();
    let profile = ProfileAssembler::new(&source)
        .today(today())
        .build(
            "p1",
            ManualFactors {
                smoker: true,
                diabetic: true,
            },
        )
        .unwrap();
    assert!(profile.smoker());
    assert!(profile.diabetic());
    assert_eq!(profile.id(), "p1");
}

#[test]
fn unknown_patient() {
    let err = build_profile(aino(), "nobody", ManualFactors::default()).unwrap_err();
    assert!(matches!(err, ProfileError::NotFound(id) if id == "nobody"));
}

#[test]
fn fetch_reports_unknown_patient() {
    assert!(matches!(
        fetch_clinical_record(aino(), "p2"),
        Err(ProfileError::NotFound(_))
    ));
}

#[test]
fn missing_measurements_default_to_zero() {
    let json = bundle_json(vec![patient_resource(
        "p9", "Jussi", "Korhonen", "19581120", "male",
    )]);
    let source = BundleSource::from_json(&json).unwrap();
    let profile = ProfileAssembler::new(&source)
        .today(today())
        .build("p9", ManualFactors::default())
        .unwrap();
    assert_eq!(profile.age(), 65);
    assert_eq!(profile.systolic_bp(), 0.0);
    assert_eq!(profile.total_cholesterol(), 0.0);
    assert_eq!(profile.hdl(), 0.0);
}

#[test]
fn missing_name_is_incomplete() {
    let json = bundle_json(vec![json!({
        "resourceType": "Patient",
        "id": "p2",
        "gender": "male",
        "birthDate": "1970-01-01",
        "name": [{"family": "Korhonen"}]
    })]);
    let source = BundleSource::from_json(&json).unwrap();
    let err = ProfileAssembler::new(&source)
        .today(today())
        .clinical_record("p2")
        .unwrap_err();
    assert!(matches!(
        err,
        ProfileError::DataIncomplete {
            field: "name.given",
            ..
        }
    ));
}

#[test]
fn missing_family_name_is_incomplete() {
    let json = bundle_json(vec![json!({
        "resourceType": "Patient",
        "id": "p3",
        "gender": "female",
        "birthDate": "1970-01-01",
        "name": [{"given": ["Aino"]}]
    })]);
    let source = BundleSource::from_json(&json).unwrap();
    let err = ProfileAssembler::new(&source)
        .today(today())
        .clinical_record("p3")
        .unwrap_err();
    assert!(matches!(
        err,
        ProfileError::DataIncomplete {
            field: "name.family",
            ..
        }
    ));
}

#[test]
fn missing_birth_date_is_incomplete() {
    let json = bundle_json(vec![json!({
        "resourceType": "Patient",
        "id": "p3",
        "name": [{"given": ["Ella"], "family": ["Nieminen"]}]
    })]);
    let source = BundleSource::from_json(&json).unwrap();
    let err = ProfileAssembler::new(&source)
        .clinical_record("p3")
        .unwrap_err();
    assert!(matches!(
        err,
        ProfileError::DataIncomplete {
            field: "birthDate",
            ..
        }
    ));
}

#[test]
fn impossible_birth_dates() {
    for dob in ["1964-02-30", "2030-01-01", "March 1964"] {
        let json = bundle_json(vec![patient_resource("p4", "Ella", "Nieminen", dob, "female")]);
        let source = BundleSource::from_json(&json).unwrap();
        let err = ProfileAssembler::new(&source)
            .today(today())
            .clinical_record("p4")
            .unwrap_err();
        match err {
            ProfileError::InvalidBirthDate { value, .. } => assert_eq!(value, dob),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn missing_gender_is_unknown() {
    let json = bundle_json(vec![json!({
        "resourceType": "Patient",
        "id": "p5",
        "birthDate": "1980-05-05",
        "name": [{"given": ["Alex"], "family": "Lehto"}]
    })]);
    let source = BundleSource::from_json(&json).unwrap();
    let record = ProfileAssembler::new(&source)
        .today(today())
        .clinical_record("p5")
        .unwrap();
    assert_eq!(record.gender, Gender::Unknown);
}

#[test]
fn custom_observation_codes() {
    let json = bundle_json(vec![
        patient_resource("p6", "Ella", "Nieminen", "1950-01-01", "female"),
        observation_resource(Some("p6"), "8480-6", 155.0, "mmHg"),
        observation_resource(Some("p6"), "Systolic blood pressure", 110.0, "mmHg"),
    ]);
    let source = BundleSource::from_json(&json).unwrap();
    let codes = ObservationCodes {
        systolic_bp: "8480-6".into(),
        ..ObservationCodes::default()
    };
    let record = ProfileAssembler::new(&source)
        .codes(codes)
        .today(today())
        .clinical_record("p6")
        .unwrap();
    assert_eq!(record.systolic_bp, 155.0);
}
