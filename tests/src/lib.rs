//! Fixture access for the workflow tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use medi_data::{BundleSource, SourceError};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn load_fixture(name: &str) -> Result<BundleSource, SourceError> {
    BundleSource::from_file(fixture_path(name))
}

/// Every fixture bundle in one source.
pub fn load_all_fixtures() -> Result<BundleSource, SourceError> {
    BundleSource::from_dir(fixtures_dir())
}

/// The date the fixture ages are stated against.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}
