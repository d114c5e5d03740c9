//! Clinical record primitives for cardiovascular risk assessment.
//!
//! - Decode FHIR Patient/Observation resources and Bundles (`fhir`, `fhir_bundle`)
//! - Look patients up through the `ClinicalSource` trait; `BundleSource` serves
//!   bundle files or directories
//! - Pull the first usable measurement for a code with `extract_value`
//! - Convert cholesterol from mg/dL to mmol/L with `convert_cholesterol`
//!
//! ```
//! use medi_data::{convert_cholesterol, extract_value, BundleSource, ClinicalSource, HDL_CODE};
//! let json = r#"{"resourceType":"Bundle","entry":[
//!   {"resource":{"resourceType":"Patient","id":"p1","gender":"female",
//!                "birthDate":"1964-03-02","name":[{"given":["Aino"],"family":"Virtanen"}]}},
//!   {"resource":{"resourceType":"Observation","code":{"text":"HDLc SerPl-mCnc"},
//!                "valueQuantity":{"value":50,"unit":"mg/dL"}}}
//! ]}"#;
//! let source = BundleSource::from_json(json).unwrap();
//! let obs = source.fetch_observations("p1").unwrap();
//! assert_eq!(convert_cholesterol(extract_value(&obs, HDL_CODE)), 1.3);
//! ```
pub mod convert;
pub mod extract;
pub mod fhir;
pub mod fhir_any;
pub mod fhir_bundle;
pub mod sanitize;
pub mod source;
pub mod testdata;

pub use convert::{convert_cholesterol, convert_cholesterol_text, round_one_decimal, ConvertError};
pub use extract::{
    extract_value, first_value, ObservationCodes, ObservationLike, HDL_CODE, MISSING_VALUE,
    SYSTOLIC_BP_CODE, TOTAL_CHOLESTEROL_CODE,
};
pub use fhir::{patient_reference_id, FHIRObservation, FHIRPatient, FHIRResource, Gender};
pub use fhir_any::FHIRAny;
pub use fhir_bundle::{BundleError, FHIRBundle};
pub use source::{BundleSource, ClinicalSource, SourceError};
