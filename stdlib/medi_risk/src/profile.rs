use chrono::{Datelike, Local, NaiveDate};
use medi_data::{
    convert_cholesterol, extract_value, ClinicalSource, FHIRObservation, Gender, ObservationCodes,
    SourceError,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("no demographic record for patient {0:?}")]
    NotFound(String),
    #[error("patient {patient_id:?} record is missing {field}")]
    DataIncomplete {
        patient_id: String,
        field: &'static str,
    },
    #[error("patient {patient_id:?} has an unusable birth date {value:?}")]
    InvalidBirthDate { patient_id: String, value: String },
    #[error(transparent)]
    Source(SourceError),
}

impl From<SourceError> for ProfileError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(id) => ProfileError::NotFound(id),
            other => ProfileError::Source(other),
        }
    }
}

/// Everything the clinical source knows about a patient, normalized.
///
/// Blood pressure is in mmHg, cholesterol values in mmol/L. A measurement the
/// source does not carry is 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalRecord {
    pub patient_id: String,
    pub display_name: String,
    pub gender: Gender,
    pub age: u32,
    pub systolic_bp: f64,
    pub total_cholesterol: f64,
    pub hdl: f64,
}

/// Risk factors the clinical source does not carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManualFactors {
    pub smoker: bool,
    pub diabetic: bool,
}

/// The complete input of the risk models. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientProfile {
    id: String,
    display_name: String,
    gender: Gender,
    age: u32,
    systolic_bp: f64,
    total_cholesterol: f64,
    hdl: f64,
    smoker: bool,
    diabetic: bool,
}

impl PatientProfile {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn gender(&self) -> Gender {
        self.gender
    }
    pub fn age(&self) -> u32 {
        self.age
    }
    pub fn systolic_bp(&self) -> f64 {
        self.systolic_bp
    }
    pub fn total_cholesterol(&self) -> f64 {
        self.total_cholesterol
    }
    pub fn hdl(&self) -> f64 {
        self.hdl
    }
    pub fn smoker(&self) -> bool {
        self.smoker
    }
    pub fn diabetic(&self) -> bool {
        self.diabetic
    }
}

impl ClinicalRecord {
    /// Merge in the manual factors. Negative or NaN measurements become 0.
    pub fn into_profile(self, factors: ManualFactors) -> PatientProfile {
        PatientProfile {
            id: self.patient_id,
            display_name: self.display_name,
            gender: self.gender,
            age: self.age,
            systolic_bp: self.systolic_bp.max(0.0),
            total_cholesterol: self.total_cholesterol.max(0.0),
            hdl: self.hdl.max(0.0),
            smoker: factors.smoker,
            diabetic: factors.diabetic,
        }
    }
}

/// Completed years between `birth` and `today`; `None` if born after `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Assembles profiles from a [`ClinicalSource`].
///
/// ```
/// use chrono::NaiveDate;
/// use medi_data::{testdata::*, BundleSource};
/// use medi_risk::{ManualFactors, ProfileAssembler};
///
/// let json = bundle_json(vec![
///     patient_resource("p1", "Aino", "Virtanen", "1964-03-02", "female"),
///     observation_resource(None, "Systolic blood pressure", 141.0, "mmHg"),
/// ]);
/// let source = BundleSource::from_json(&json).unwrap();
/// let profile = ProfileAssembler::new(&source)
///     .today(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
///     .build("p1", ManualFactors::default())
///     .unwrap();
/// assert_eq!(profile.age(), 59);
/// assert_eq!(profile.systolic_bp(), 141.0);
/// assert_eq!(profile.hdl(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ProfileAssembler<S> {
    source: S,
    codes: ObservationCodes,
    today: Option<NaiveDate>,
}

impl<S: ClinicalSource> ProfileAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            codes: ObservationCodes::default(),
            today: None,
        }
    }

    pub fn codes(mut self, codes: ObservationCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Reference date for age; defaults to the local calendar date.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn clinical_record(&self, patient_id: &str) -> Result<ClinicalRecord, ProfileError> {
        let patient = self.source.fetch_demographics(patient_id)?;

        let raw_birth = patient
            .birth_date
            .as_deref()
            .ok_or_else(|| incomplete(patient_id, "birthDate"))?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let age = patient
            .birth_date()
            .and_then(|birth| age_on(birth, today))
            .ok_or_else(|| ProfileError::InvalidBirthDate {
                patient_id: patient_id.to_string(),
                value: raw_birth.to_string(),
            })?;

        let display_name = patient.display_name().ok_or_else(|| {
            let field = if patient.given_name.is_none() {
                "name.given"
            } else {
                "name.family"
            };
            incomplete(patient_id, field)
        })?;

        let observations: Vec<FHIRObservation> = self.source.fetch_observations(patient_id)?;
        let record = ClinicalRecord {
            patient_id: patient.id.clone(),
            display_name,
            gender: patient.gender.unwrap_or(Gender::Unknown),
            age,
            systolic_bp: extract_value(&observations, &self.codes.systolic_bp),
            total_cholesterol: convert_cholesterol(extract_value(
                &observations,
                &self.codes.total_cholesterol,
            )),
            hdl: convert_cholesterol(extract_value(&observations, &self.codes.hdl)),
        };
        log::debug!(
            "patient {patient_id}: {} observations, age {age}, bp {}, chol {}, hdl {}",
            observations.len(),
            record.systolic_bp,
            record.total_cholesterol,
            record.hdl
        );
        Ok(record)
    }

    pub fn build(
        &self,
        patient_id: &str,
        factors: ManualFactors,
    ) -> Result<PatientProfile, ProfileError> {
        Ok(self.clinical_record(patient_id)?.into_profile(factors))
    }
}

fn incomplete(patient_id: &str, field: &'static str) -> ProfileError {
    ProfileError::DataIncomplete {
        patient_id: patient_id.to_string(),
        field,
    }
}

pub fn fetch_clinical_record<S: ClinicalSource>(
    source: S,
    patient_id: &str,
) -> Result<ClinicalRecord, ProfileError> {
    ProfileAssembler::new(source).clinical_record(patient_id)
}

pub fn build_profile<S: ClinicalSource>(
    source: S,
    patient_id: &str,
    factors: ManualFactors,
) -> Result<PatientProfile, ProfileError> {
    ProfileAssembler::new(source).build(patient_id, factors)
}
