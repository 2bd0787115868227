use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("failed to read seed file {}: {source}", .path.display())]
    SeedFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed data: {0}")]
    SeedData(#[from] fhir::FhirError),
    #[error("invalid text: {0}")]
    Text(#[from] stub_types::TextError),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
