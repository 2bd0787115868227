//! FHIR `Patient` wire model.
//!
//! Responsibilities:
//! - Define the JSON shape of the patient resources served by the stub
//! - Parse patient lists (seed files) with path-aware error messages
//! - Offer small builders so seed sets can be written in code
//!
//! Notes:
//! - Only `resourceType`, `id` and the `system`/`value` of identifiers are typed. `name`,
//!   `gender`, `birthDate` and any other element are carried through untouched, so a served
//!   record has the same content it was seeded with.
//! - Identifiers keep their input order. Which of them are searchable is decided by the
//!   registry, not here.

use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use stub_types::NonEmptyText;
use utoipa::ToSchema;

/// Value of `resourceType` for patient resources.
pub const PATIENT_RESOURCE_TYPE: &str = "Patient";

/// A business identifier attached to a patient, e.g. a medical-record-number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identifier {
    /// Namespace of the value. Absent means the default namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub value: String,

    /// Other identifier elements (`use`, `type`, `period`, ...), kept as given.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl Identifier {
    pub fn new(system: Option<String>, value: impl Into<String>) -> Self {
        Self {
            system,
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// `true` when no system is given or the system is an empty string.
    pub fn has_default_system(&self) -> bool {
        self.system.as_deref().is_none_or(str::is_empty)
    }
}

/// Patient resource as served over the wire and accepted in seed files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResource {
    #[schema(example = "Patient")]
    pub resource_type: String,

    #[schema(value_type = String, example = "pat-123")]
    pub id: NonEmptyText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub name: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "female")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "1980-12-01")]
    pub birth_date: Option<String>,

    /// Every other element of the resource (`meta`, `telecom`, `address`, ...).
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl PatientResource {
    /// Start an active patient with the given id and no other content.
    pub fn new(id: NonEmptyText) -> Self {
        Self {
            resource_type: PATIENT_RESOURCE_TYPE.to_string(),
            id,
            active: Some(true),
            identifier: Vec::new(),
            name: Vec::new(),
            gender: None,
            birth_date: None,
            extra: Map::new(),
        }
    }

    pub fn with_identifier(mut self, system: Option<&str>, value: impl Into<String>) -> Self {
        self.identifier
            .push(Identifier::new(system.map(str::to_string), value));
        self
    }

    pub fn with_official_name(mut self, family: &str, given: &[&str]) -> Self {
        self.name.push(json!({
            "use": "official",
            "family": family,
            "given": given,
        }));
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Parse a JSON array of patient resources.
    ///
    /// Uses `serde_path_to_error` so schema mismatches name the failing field
    /// (e.g. `[0].identifier[0].value`).
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON is not an array of objects,
    /// - an element lacks a non-empty `id`, or an identifier lacks a string `value`,
    /// - an element's `resourceType` is not `"Patient"`.
    pub fn list_from_json_str(text: &str) -> FhirResult<Vec<Self>> {
        let patients: Vec<PatientResource> = deserialize_with_path(text, "Patient list")?;
        for patient in &patients {
            patient.ensure_resource_type()?;
        }
        Ok(patients)
    }

    fn ensure_resource_type(&self) -> FhirResult<()> {
        if self.resource_type != PATIENT_RESOURCE_TYPE {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Patient', got '{}'",
                self.resource_type
            )));
        }
        Ok(())
    }
}

fn deserialize_with_path<T>(text: &str, what: &str) -> FhirResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        FhirError::Translation(format!("{what} schema mismatch at {path}: {source}"))
    })
}
