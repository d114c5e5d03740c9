use crate::fhir::{FHIRObservation, FHIRPatient, FHIRResource};

#[derive(Debug, Clone, PartialEq)]
pub enum FHIRAny {
    Patient(FHIRPatient),
    Observation(FHIRObservation),
}

impl FHIRAny {
    pub fn resource(&self) -> &dyn FHIRResource {
        match self {
            FHIRAny::Patient(p) => p,
            FHIRAny::Observation(o) => o,
        }
    }

    /// `Type/id`, as in a FHIR reference.
    pub fn reference(&self) -> String {
        let r = self.resource();
        format!("{}/{}", r.resource_type(), r.id())
    }
}
