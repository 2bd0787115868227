//! `OperationOutcome` error payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const OPERATION_OUTCOME_RESOURCE_TYPE: &str = "OperationOutcome";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
}

/// Subset of the FHIR `issue-type` code system the stub emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// Missing or rejected credentials.
    Login,
    /// The referenced resource does not exist.
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,
    pub code: IssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    #[schema(example = "OperationOutcome")]
    pub resource_type: String,
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    /// Single-issue outcome with `severity: error`.
    pub fn error(code: IssueType, diagnostics: impl Into<String>) -> Self {
        Self {
            resource_type: OPERATION_OUTCOME_RESOURCE_TYPE.to_string(),
            issue: vec![OperationOutcomeIssue {
                severity: IssueSeverity::Error,
                code,
                diagnostics: Some(diagnostics.into()),
            }],
        }
    }
}
