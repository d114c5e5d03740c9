use approx::assert_abs_diff_eq;
use medi_data::Gender;
use medi_risk::{combined_risk, compute_risk, ClinicalRecord, ManualFactors, PatientProfile};
use proptest::prelude::*;

fn profile(
    gender: Gender,
    age: u32,
    bp: f64,
    ch: f64,
    hdl: f64,
    smoker: bool,
    diabetic: bool,
) -> PatientProfile {
    ClinicalRecord {
        patient_id: "prop".into(),
        display_name: "Prop Test".into(),
        gender,
        age,
        systolic_bp: bp,
        total_cholesterol: ch,
        hdl,
    }
    .into_profile(ManualFactors { smoker, diabetic })
}

fn is_one_decimal(x: f64) -> bool {
    ((x * 10.0).round() - x * 10.0).abs() < 1e-9
}

fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Female),
        Just(Gender::Male),
        Just(Gender::Other),
        Just(Gender::Unknown),
    ]
}

proptest! {
    #[test]
    fn risks_are_rounded_percentages(
        g in gender(),
        age in 0u32..120,
        bp in 0.0f64..300.0,
        ch in 0.0f64..25.0,
        hdl in 0.0f64..6.0,
        smoker in any::<bool>(),
        diabetic in any::<bool>(),
    ) {
        let r = compute_risk(&profile(g, age, bp, ch, hdl, smoker, diabetic));
        for v in [r.coronary(), r.stroke(), r.combined()] {
            prop_assert!((0.0..=100.0).contains(&v));
            prop_assert!(is_one_decimal(v));
        }
        prop_assert!(r.combined() >= r.coronary().max(r.stroke()));
    }

    #[test]
    fn smoking_never_lowers_risk(
        g in gender(),
        age in 20u32..90,
        bp in 80.0f64..240.0,
        ch in 2.0f64..20.0,
        hdl in 0.3f64..5.0,
    ) {
        let without = compute_risk(&profile(g, age, bp, ch, hdl, false, false));
        let with = compute_risk(&profile(g, age, bp, ch, hdl, true, false));
        prop_assert!(with.coronary() >= without.coronary());
        prop_assert!(with.stroke() >= without.stroke());
    }

    #[test]
    fn combined_is_symmetric(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        prop_assert_eq!(combined_risk(a, b), combined_risk(b, a));
    }
}

#[test]
fn golden_reference_woman() {
    let r = compute_risk(&profile(Gender::Female, 60, 140.0, 5.5, 1.3, false, false));
    assert_abs_diff_eq!(r.stroke(), 2.7, epsilon = 1e-12);
    assert_abs_diff_eq!(r.coronary(), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(r.combined(), 5.6, epsilon = 1e-12);
}

#[test]
fn diabetes_raises_both_risks_for_men() {
    let base = compute_risk(&profile(Gender::Male, 65, 150.0, 6.0, 1.0, false, false));
    let diabetic = compute_risk(&profile(Gender::Male, 65, 150.0, 6.0, 1.0, false, true));
    assert!(diabetic.coronary() > base.coronary());
    assert!(diabetic.stroke() > base.stroke());
}
