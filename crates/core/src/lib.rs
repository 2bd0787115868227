//! # Stub Core
//!
//! Core logic for the SMART-on-FHIR stub server.
//!
//! This crate contains the pure data operations:
//! - Startup configuration (`config`)
//! - The in-memory patient registry and its identifier index (`registry`)
//! - Parsing of `identifier` search parameters (`identifier`)
//! - Seed data (`seed`)
//!
//! **No API concerns**: HTTP routing, bearer checks and response status codes belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod seed;

pub use config::{CoreConfig, IdentifierSystemPolicy};
pub use error::{PatientError, PatientResult};
pub use identifier::{parse_identifier_params, IdentifierQuery};
pub use registry::PatientRegistry;

use fhir::{Bundle, PatientResource, SmartConfiguration};
use std::sync::Arc;

/// Patient read/search operations over a seeded registry.
///
/// Cheap to clone; configuration and registry are shared.
#[derive(Clone, Debug)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    registry: Arc<PatientRegistry>,
}

impl PatientService {
    pub fn new(cfg: Arc<CoreConfig>, registry: Arc<PatientRegistry>) -> Self {
        Self { cfg, registry }
    }

    pub fn cfg(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &PatientRegistry {
        &self.registry
    }

    /// Read a single patient by resource id.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has this id.
    pub fn read_patient(&self, id: &str) -> PatientResult<PatientResource> {
        self.registry
            .get(id)
            .cloned()
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Search patients by raw `identifier` parameter values and wrap the matches in a
    /// searchset bundle.
    ///
    /// No values means no results; the stub never lists every patient.
    pub fn search_patients<S>(&self, raw_identifiers: &[S]) -> Bundle
    where
        S: AsRef<str>,
    {
        let queries = parse_identifier_params(raw_identifiers);
        let matches = self
            .registry
            .search_by_identifier(&queries, self.cfg.identifier_system_policy());

        tracing::debug!(
            queries = queries.len(),
            matches = matches.len(),
            "patient identifier search"
        );

        Bundle::searchset(self.cfg.base_url(), matches.into_iter().cloned())
    }

    pub fn smart_configuration(&self) -> SmartConfiguration {
        SmartConfiguration::for_auth_server(self.cfg.auth_server_base_url())
    }

    /// Capability statement dated now.
    pub fn capability_statement(&self) -> serde_json::Value {
        fhir::capability_statement(self.cfg.auth_server_base_url(), chrono::Utc::now())
    }
}
