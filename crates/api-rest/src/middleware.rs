use crate::{ApiError, AppState};
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// Bearer gate for the `Patient` routes.
///
/// Rejected requests never reach the handler. Accepted requests pass through unchanged; no
/// claims or scopes are derived from the token.
pub(crate) async fn require_bearer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let expected = state.patient_service().cfg().bearer_token();
    if let Err(reason) = api_shared::validate_bearer(header, expected) {
        tracing::info!(path = %req.uri().path(), %reason, "rejected request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
