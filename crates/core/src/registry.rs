//! In-memory patient registry.
//!
//! Two indexes are kept:
//! - by resource id, one entry per patient
//! - by identifier value, for identifiers whose system is absent/empty or equals the configured
//!   MRN system
//!
//! The identifier index stores patient ids, never copies of resources, so every indexed value
//! resolves to a patient held in the id index.
//!
//! The registry is filled before serving starts and then shared read-only behind an `Arc`.

use crate::config::IdentifierSystemPolicy;
use crate::identifier::IdentifierQuery;
use fhir::{Identifier, PatientResource};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct PatientRegistry {
    mrn_system: String,
    by_id: HashMap<String, PatientResource>,
    by_identifier_value: HashMap<String, String>,
    insertion_order: Vec<String>,
}

impl PatientRegistry {
    /// Create an empty registry indexing identifiers of `mrn_system`.
    pub fn new(mrn_system: impl Into<String>) -> Self {
        Self {
            mrn_system: mrn_system.into(),
            by_id: HashMap::new(),
            by_identifier_value: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Create a registry and insert `patients` in order.
    pub fn with_patients<I>(mrn_system: impl Into<String>, patients: I) -> Self
    where
        I: IntoIterator<Item = PatientResource>,
    {
        let mut registry = Self::new(mrn_system);
        for patient in patients {
            registry.insert(patient);
        }
        registry
    }

    /// Add a patient to both indexes.
    ///
    /// Re-inserting an existing id replaces the record and drops the identifier entries that
    /// pointed at it first. When two patients share an identifier value the later insert owns
    /// the index entry.
    pub fn insert(&mut self, patient: PatientResource) {
        let id = patient.id().to_string();

        if let Some(previous) = self.by_id.remove(&id) {
            tracing::warn!(patient_id = %id, "replacing patient with duplicate id");
            for identifier in &previous.identifier {
                if self.by_identifier_value.get(&identifier.value) == Some(&id) {
                    self.by_identifier_value.remove(&identifier.value);
                }
            }
        } else {
            self.insertion_order.push(id.clone());
        }

        let indexed_values: Vec<String> = patient
            .identifier
            .iter()
            .filter(|identifier| self.is_indexed(identifier))
            .map(|identifier| identifier.value.clone())
            .collect();

        for value in indexed_values {
            if let Some(previous_owner) = self.by_identifier_value.insert(value.clone(), id.clone())
            {
                if previous_owner != id {
                    tracing::warn!(
                        identifier = %value,
                        previous = %previous_owner,
                        current = %id,
                        "identifier value already indexed; later patient wins"
                    );
                }
            }
        }

        self.by_id.insert(id, patient);
    }

    fn is_indexed(&self, identifier: &Identifier) -> bool {
        if identifier.value.is_empty() {
            return false;
        }
        identifier.has_default_system() || identifier.system.as_deref() == Some(self.mrn_system.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&PatientResource> {
        self.by_id.get(id)
    }

    /// Resolve a bare identifier value through the identifier index.
    pub fn find_by_identifier_value(&self, value: &str) -> Option<&PatientResource> {
        self.by_identifier_value
            .get(value)
            .and_then(|id| self.by_id.get(id))
    }

    /// Resolve parsed identifier queries to patients.
    ///
    /// Results keep the order in which patients were first matched. A patient reached by
    /// several queries appears once. Queries that `policy` rejects, and values with no match,
    /// are skipped. An empty query list yields no patients.
    pub fn search_by_identifier(
        &self,
        queries: &[IdentifierQuery],
        policy: IdentifierSystemPolicy,
    ) -> Vec<&PatientResource> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut matches = Vec::new();

        for query in queries {
            if !query.is_permitted(policy, &self.mrn_system) {
                tracing::debug!(
                    system = ?query.system,
                    value = %query.value,
                    "identifier system does not match MRN system"
                );
                continue;
            }
            let Some(patient) = self.find_by_identifier_value(&query.value) else {
                continue;
            };
            if seen.insert(patient.id()) {
                matches.push(patient);
            }
        }

        matches
    }

    /// All patients in first-insertion order.
    pub fn patients(&self) -> impl Iterator<Item = &PatientResource> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
