use stub_types::BearerToken;

/// Authentication scheme accepted in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Reasons a credential was refused.
///
/// Callers should answer every variant the same way; the distinction is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    #[error("invalid bearer token")]
    InvalidToken,
}

/// Validates an `Authorization` header value against the expected bearer token.
///
/// The header must be exactly `Bearer <token>`: the case-sensitive scheme, one space, and a
/// token equal to `expected`. Anything after the token (another space, a second token) makes
/// the credential invalid.
///
/// Returns `Ok(())` if the credential is accepted.
pub fn validate_bearer(header: Option<&str>, expected: &BearerToken) -> Result<(), AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::UnsupportedScheme)?;
    if scheme != BEARER_SCHEME {
        return Err(AuthError::UnsupportedScheme);
    }

    if expected.matches(token) {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}
