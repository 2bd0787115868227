use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use fhir::{IssueType, OperationOutcome};

const UNAUTHORIZED_DIAGNOSTICS: &str =
    "Invalid or missing bearer token. Provide Authorization: Bearer <token>.";

/// Errors surfaced by the REST API, rendered as FHIR `OperationOutcome` bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, malformed or wrong bearer credential (401, `login`).
    Unauthorized,
    /// No patient with the requested id (404, `not-found`).
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn outcome(&self) -> OperationOutcome {
        match self {
            ApiError::Unauthorized => {
                OperationOutcome::error(IssueType::Login, UNAUTHORIZED_DIAGNOSTICS)
            }
            ApiError::NotFound(id) => {
                OperationOutcome::error(IssueType::NotFound, format!("Patient '{id}' not found"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.outcome())).into_response()
    }
}
