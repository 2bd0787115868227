//! Parsing of `identifier` search parameters.
//!
//! A raw value is either `value` or `system|value`. Only the first `|` separates the two, so a
//! value may itself contain `|`.

use crate::config::IdentifierSystemPolicy;

/// One parsed `identifier` query value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierQuery {
    /// System named before the `|`, if a `|` was present. May be empty (`|value`).
    pub system: Option<String>,
    /// Value used for the index lookup.
    pub value: String,
}

impl IdentifierQuery {
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('|') {
            Some((system, value)) => Self {
                system: Some(system.to_string()),
                value: value.to_string(),
            },
            None => Self {
                system: None,
                value: raw.to_string(),
            },
        }
    }

    /// The asserted system, when one was given and is non-empty.
    pub fn asserted_system(&self) -> Option<&str> {
        self.system.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether this query may be looked up under `policy`.
    pub fn is_permitted(&self, policy: IdentifierSystemPolicy, mrn_system: &str) -> bool {
        match policy {
            IdentifierSystemPolicy::Ignore => true,
            IdentifierSystemPolicy::Enforce => self
                .asserted_system()
                .is_none_or(|system| system == mrn_system),
        }
    }
}

/// Parse every raw value in order. Output has the same length as the input.
pub fn parse_identifier_params<I, S>(raw_values: I) -> Vec<IdentifierQuery>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_values
        .into_iter()
        .map(|raw| IdentifierQuery::parse(raw.as_ref()))
        .collect()
}
