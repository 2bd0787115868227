//! `CapabilityStatement` served at `/metadata`.

use crate::smart::{AUTHORIZE_PATH, TOKEN_PATH};
use crate::FHIR_VERSION;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

const SECURITY_SERVICE_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/restful-security-service";
const OAUTH_URIS_EXTENSION: &str =
    "http://fhir-registry.smarthealthit.org/StructureDefinition/oauth-uris";

/// Build the capability statement for this server.
///
/// Only `Patient` read and type-level search by `identifier` are advertised. `generated_at`
/// becomes the statement `date`.
pub fn capability_statement(auth_server_base_url: &str, generated_at: DateTime<Utc>) -> Value {
    json!({
        "resourceType": "CapabilityStatement",
        "status": "active",
        "date": generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "kind": "instance",
        "fhirVersion": FHIR_VERSION,
        "format": ["json"],
        "rest": [{
            "mode": "server",
            "security": {
                "service": [{
                    "coding": [{
                        "system": SECURITY_SERVICE_SYSTEM,
                        "code": "SMART-on-FHIR"
                    }]
                }],
                "extension": [{
                    "url": OAUTH_URIS_EXTENSION,
                    "extension": [
                        { "url": "authorize", "valueUri": format!("{auth_server_base_url}{AUTHORIZE_PATH}") },
                        { "url": "token", "valueUri": format!("{auth_server_base_url}{TOKEN_PATH}") }
                    ]
                }]
            },
            "resource": [{
                "type": "Patient",
                "interaction": [
                    { "code": "read" },
                    { "code": "search-type" }
                ],
                "searchParam": [{
                    "name": "identifier",
                    "type": "token",
                    "documentation": "Medical-record-number, as `value` or `system|value`"
                }]
            }]
        }]
    })
}
