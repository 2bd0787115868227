//! SMART App Launch discovery document (`/.well-known/smart-configuration`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const SCOPES_SUPPORTED: &[&str] = &[
    "openid",
    "fhirUser",
    "launch",
    "launch/patient",
    "patient/*.read",
    "offline_access",
];
const RESPONSE_TYPES_SUPPORTED: &[&str] = &["code"];
const GRANT_TYPES_SUPPORTED: &[&str] = &["authorization_code", "refresh_token", "client_credentials"];
const TOKEN_ENDPOINT_AUTH_METHODS_SUPPORTED: &[&str] = &["client_secret_basic", "none"];
const CAPABILITIES: &[&str] = &["context-ehr", "permission-patient", "permission-offline"];

/// OAuth2 endpoint paths relative to the authorization server base URL.
pub const AUTHORIZE_PATH: &str = "/oauth2/authorize";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const INTROSPECT_PATH: &str = "/oauth2/introspect";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SmartConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub introspection_endpoint: String,
    pub scopes_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub capabilities: Vec<String>,
}

impl SmartConfiguration {
    /// Discovery document pointing every endpoint at `auth_server_base_url`.
    pub fn for_auth_server(auth_server_base_url: &str) -> Self {
        fn owned(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        Self {
            issuer: auth_server_base_url.to_string(),
            authorization_endpoint: format!("{auth_server_base_url}{AUTHORIZE_PATH}"),
            token_endpoint: format!("{auth_server_base_url}{TOKEN_PATH}"),
            introspection_endpoint: format!("{auth_server_base_url}{INTROSPECT_PATH}"),
            scopes_supported: owned(SCOPES_SUPPORTED),
            response_types_supported: owned(RESPONSE_TYPES_SUPPORTED),
            grant_types_supported: owned(GRANT_TYPES_SUPPORTED),
            token_endpoint_auth_methods_supported: owned(TOKEN_ENDPOINT_AUTH_METHODS_SUPPORTED),
            capabilities: owned(CAPABILITIES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hang_off_the_auth_server() {
        let doc = SmartConfiguration::for_auth_server("https://auth.example.org/realms/smart");

        assert_eq!(doc.issuer, "https://auth.example.org/realms/smart");
        assert_eq!(
            doc.token_endpoint,
            "https://auth.example.org/realms/smart/oauth2/token"
        );
        assert_eq!(
            doc.introspection_endpoint,
            "https://auth.example.org/realms/smart/oauth2/introspect"
        );
        assert!(doc.scopes_supported.iter().any(|s| s == "patient/*.read"));
        assert!(doc.capabilities.iter().any(|c| c == "context-ehr"));
    }
}
