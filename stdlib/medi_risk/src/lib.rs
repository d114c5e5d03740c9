//! Stroke and coronary heart disease risk for a single patient.
//!
//! A [`PatientProfile`] is assembled from a [`medi_data::ClinicalSource`] plus
//! the factors the record does not carry (smoking, diabetes), which come from a
//! validated [`ManualInput`]. [`compute_risk`] turns the profile into a
//! [`RiskResult`].
//!
//! ```
//! use medi_data::Gender;
//! use medi_risk::{compute_risk, ClinicalRecord, ManualFactors};
//!
//! let profile = ClinicalRecord {
//!     patient_id: "p1".into(),
//!     display_name: "Aino Virtanen".into(),
//!     gender: Gender::Female,
//!     age: 60,
//!     systolic_bp: 140.0,
//!     total_cholesterol: 5.5,
//!     hdl: 1.3,
//! }
//! .into_profile(ManualFactors::default());
//! let risk = compute_risk(&profile);
//! assert_eq!((risk.coronary(), risk.stroke(), risk.combined()), (3.0, 2.7, 5.6));
//! ```
pub mod profile;
pub mod risk;
pub mod validate;

pub use profile::{
    age_on, build_profile, fetch_clinical_record, ClinicalRecord, ManualFactors, PatientProfile,
    ProfileAssembler, ProfileError,
};
pub use risk::{combined_risk, compute_risk, coronary_risk, stroke_risk, RiskBranch, RiskResult};
pub use validate::{
    validate_manual_input, CheckPair, FieldIssue, IssueKind, ManualField, ManualInput,
    ValidationReport,
};
