//! Searchset `Bundle` envelope.

use crate::patient::PatientResource;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Searchset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntryMode {
    Match,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BundleEntrySearch {
    pub mode: SearchEntryMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Absolute URL of the resource on this server.
    pub full_url: String,
    pub resource: PatientResource,
    pub search: BundleEntrySearch,
}

/// Search results envelope.
///
/// `total` always equals the number of entries; the stub does not page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[schema(example = "Bundle")]
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    pub total: usize,

    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Wrap matched patients in a searchset, building each `fullUrl` from `base_url`.
    pub fn searchset<I>(base_url: &str, patients: I) -> Self
    where
        I: IntoIterator<Item = PatientResource>,
    {
        let entry: Vec<BundleEntry> = patients
            .into_iter()
            .map(|resource| BundleEntry {
                full_url: format!("{base_url}/Patient/{}", resource.id()),
                resource,
                search: BundleEntrySearch {
                    mode: SearchEntryMode::Match,
                },
            })
            .collect();

        Self {
            resource_type: BUNDLE_RESOURCE_TYPE.to_string(),
            bundle_type: BundleType::Searchset,
            total: entry.len(),
            entry,
        }
    }
}
