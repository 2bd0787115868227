//! FHIR wire/boundary support for the SMART-on-FHIR stub.
//!
//! This crate provides the **JSON wire models** the stub exchanges over HTTP:
//! - `Patient` resources (read, search results, seed files)
//! - searchset `Bundle` envelopes
//! - `OperationOutcome` error payloads
//! - the SMART discovery document and the `CapabilityStatement`
//!
//! It performs no FHIR profile validation. Patient parsing checks only what the stub relies on
//! (`resourceType`, a non-empty `id`, identifier `value`s) and keeps every other element.

pub mod bundle;
pub mod capability;
pub mod outcome;
pub mod patient;
pub mod smart;

pub use bundle::{Bundle, BundleEntry, BundleEntrySearch, BundleType, SearchEntryMode};
pub use capability::capability_statement;
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use patient::{Identifier, PatientResource};
pub use smart::SmartConfiguration;

/// FHIR version advertised by the capability statement.
pub const FHIR_VERSION: &str = "4.0.1";

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
