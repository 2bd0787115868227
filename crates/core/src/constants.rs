//! Constants used throughout the stub core crate.
//!
//! Environment variable names and their defaults live here so the server binary, the CLI and
//! the tests agree on them.

/// Listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 9000;

/// Listening host when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Medical-record-number coding system when `MRN_SYSTEM` is unset.
pub const DEFAULT_MRN_SYSTEM: &str = "http://hospital.example.org/mrn";

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";
pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_AUTH_SERVER_BASE_URL: &str = "AUTH_SERVER_BASE_URL";
pub const ENV_MRN_SYSTEM: &str = "MRN_SYSTEM";
pub const ENV_BEARER_TOKEN: &str = "BEARER_TOKEN";
pub const ENV_ENFORCE_IDENTIFIER_SYSTEM: &str = "ENFORCE_IDENTIFIER_SYSTEM";
pub const ENV_PATIENT_SEED_FILE: &str = "PATIENT_SEED_FILE";
