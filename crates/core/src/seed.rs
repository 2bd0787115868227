//! Seed data for the patient registry.
//!
//! The registry is filled either from the built-in demo patients or, when `PATIENT_SEED_FILE`
//! is configured, from a JSON array of `Patient` resources.

use crate::config::CoreConfig;
use crate::registry::PatientRegistry;
use crate::{PatientError, PatientResult};
use fhir::PatientResource;
use std::path::Path;
use stub_types::NonEmptyText;

/// The two demo patients, with MRNs in `mrn_system`.
pub fn default_patients(mrn_system: &str) -> PatientResult<Vec<PatientResource>> {
    Ok(vec![
        PatientResource::new(NonEmptyText::new("pat-123")?)
            .with_identifier(Some(mrn_system), "123456")
            .with_official_name("Fitzgerald", &["Alexandra", "Maximiliana"])
            .with_gender("female")
            .with_birth_date("1980-12-01"),
        PatientResource::new(NonEmptyText::new("pat-654")?)
            .with_identifier(Some(mrn_system), "654321")
            .with_official_name("Montagne-Bellerose", &["Elizabeth"])
            .with_gender("female")
            .with_birth_date("1982-05-14"),
    ])
}

/// Read a JSON array of patient resources from `path`.
///
/// # Errors
///
/// Returns [`PatientError::SeedFileRead`] if the file cannot be read and
/// [`PatientError::SeedData`] if its content is not a valid patient list.
pub fn load_patients_from_file(path: &Path) -> PatientResult<Vec<PatientResource>> {
    let text = std::fs::read_to_string(path).map_err(|source| PatientError::SeedFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PatientResource::list_from_json_str(&text)?)
}

/// Build the registry the server and CLI run against.
pub fn build_registry(cfg: &CoreConfig) -> PatientResult<PatientRegistry> {
    let patients = match cfg.seed_file() {
        Some(path) => {
            tracing::info!("loading patients from {}", path.display());
            load_patients_from_file(path)?
        }
        None => default_patients(cfg.mrn_system())?,
    };

    let registry = PatientRegistry::with_patients(cfg.mrn_system(), patients);
    tracing::info!(patients = registry.len(), "patient registry ready");
    Ok(registry)
}
