use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{read_dir, read_to_string};
use std::path::{Path, PathBuf};

use crate::fhir::{FHIRObservation, FHIRPatient};
use crate::fhir_any::FHIRAny;
use crate::fhir_bundle::{BundleError, FHIRBundle};
use crate::sanitize::trim_patient_names;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no patient with id {0:?}")]
    NotFound(String),
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Bundle {
        path: PathBuf,
        #[source]
        source: BundleError,
    },
}

/// Point lookups against an external clinical record store.
pub trait ClinicalSource {
    /// The demographic record for `patient_id`, or [`SourceError::NotFound`].
    fn fetch_demographics(&self, patient_id: &str) -> Result<FHIRPatient, SourceError>;

    /// The patient's observations in source order. Unknown ids yield an empty list.
    fn fetch_observations(&self, patient_id: &str) -> Result<Vec<FHIRObservation>, SourceError>;

    fn list_patient_ids(&self) -> Result<BTreeSet<String>, SourceError>;
}

impl<S: ClinicalSource + ?Sized> ClinicalSource for &S {
    fn fetch_demographics(&self, patient_id: &str) -> Result<FHIRPatient, SourceError> {
        (**self).fetch_demographics(patient_id)
    }
    fn fetch_observations(&self, patient_id: &str) -> Result<Vec<FHIRObservation>, SourceError> {
        (**self).fetch_observations(patient_id)
    }
    fn list_patient_ids(&self) -> Result<BTreeSet<String>, SourceError> {
        (**self).list_patient_ids()
    }
}

/// In-memory [`ClinicalSource`] filled from FHIR bundles.
///
/// Observations are attached to the patient in `subject.reference`. A bundle
/// holding exactly one patient (the `$everything` shape) also receives its
/// unreferenced observations; in any other bundle those are dropped.
#[derive(Debug, Clone, Default)]
pub struct BundleSource {
    patients: BTreeMap<String, FHIRPatient>,
    observations: HashMap<String, Vec<FHIRObservation>>,
}

impl BundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: FHIRBundle) -> Self {
        let mut source = Self::new();
        source.add_bundle(bundle);
        source
    }

    pub fn from_json(s: &str) -> Result<Self, BundleError> {
        Ok(Self::from_bundle(FHIRBundle::from_json(s)?))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let mut source = Self::new();
        source.load_file(path.as_ref())?;
        Ok(source)
    }

    /// Load every `*.json` bundle in `dir`, in file-name order.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let io_err = |source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut source = Self::new();
        for path in files {
            source.load_file(&path)?;
        }
        Ok(source)
    }

    /// [`from_dir`](Self::from_dir) for directories, [`from_file`](Self::from_file) otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(), SourceError> {
        let text = read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle = FHIRBundle::from_json(&text).map_err(|source| SourceError::Bundle {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "{}: {} resources",
            path.display(),
            bundle.entries.len()
        );
        self.add_bundle(bundle);
        Ok(())
    }

    pub fn add_bundle(&mut self, bundle: FHIRBundle) {
        let patient_ids: Vec<String> = bundle
            .extract_patients()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let sole_patient = match patient_ids.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        for entry in bundle.entries {
            match entry {
                FHIRAny::Patient(p) => self.insert_patient(p),
                FHIRAny::Observation(o) => {
                    match o.subject.clone().or_else(|| sole_patient.clone()) {
                        Some(patient_id) => {
                            if !patient_ids.contains(&patient_id)
                                && !self.patients.contains_key(&patient_id)
                            {
                                log::debug!(
                                    "observation {:?} refers to patient {patient_id:?}, not loaded yet",
                                    o.id
                                );
                            }
                            self.push_observation(&patient_id, o)
                        }
                        None => log::warn!(
                            "observation {:?} has no subject and the bundle has {} patients; dropped",
                            o.id,
                            patient_ids.len()
                        ),
                    }
                }
            }
        }
    }

    pub fn insert_patient(&mut self, mut patient: FHIRPatient) {
        trim_patient_names(&mut patient);
        if self.patients.contains_key(&patient.id) {
            log::debug!("patient {} replaced by a later record", patient.id);
        }
        self.patients.insert(patient.id.clone(), patient);
    }

    pub fn push_observation(&mut self, patient_id: &str, observation: FHIRObservation) {
        self.observations
            .entry(patient_id.to_string())
            .or_default()
            .push(observation);
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

impl ClinicalSource for BundleSource {
    fn fetch_demographics(&self, patient_id: &str) -> Result<FHIRPatient, SourceError> {
        self.patients
            .get(patient_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(patient_id.to_string()))
    }

    fn fetch_observations(&self, patient_id: &str) -> Result<Vec<FHIRObservation>, SourceError> {
        Ok(self
            .observations
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_patient_ids(&self) -> Result<BTreeSet<String>, SourceError> {
        Ok(self.patients.keys().cloned().collect())
    }
}
