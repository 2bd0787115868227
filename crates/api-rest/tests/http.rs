use api_rest::{router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use fhir::PatientResource;
use serde_json::Value;
use std::sync::Arc;
use stub_core::{seed, CoreConfig, IdentifierSystemPolicy, PatientRegistry};
use stub_types::{BearerToken, NonEmptyText};
use tower::ServiceExt; // for `oneshot`

const TOKEN: &str = "test-token";
const BASE_URL: &str = "http://stub.test";
const AUTH_URL: &str = "https://auth.test/realms/smart";
const MRN: &str = "http://hospital.example.org/mrn";

fn config(policy: IdentifierSystemPolicy) -> CoreConfig {
    CoreConfig::new(
        BASE_URL,
        AUTH_URL,
        MRN,
        "127.0.0.1:0",
        BearerToken::new(TOKEN).expect("token"),
    )
    .expect("config")
    .with_identifier_system_policy(policy)
}

fn app_with(policy: IdentifierSystemPolicy, patients: Vec<PatientResource>) -> Router {
    let cfg = config(policy);
    let registry = PatientRegistry::with_patients(cfg.mrn_system(), patients);
    router(AppState::new(Arc::new(cfg), Arc::new(registry)))
}

fn app() -> Router {
    let patients = seed::default_patients(MRN).expect("default seed");
    app_with(IdentifierSystemPolicy::Ignore, patients)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn entry_ids(bundle: &Value) -> Vec<String> {
    bundle["entry"]
        .as_array()
        .expect("entry array")
        .iter()
        .map(|e| e["resource"]["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn read_returns_full_seeded_record() {
    let app = app();
    let (status, body) = get(&app, "/Patient/pat-123", Some(TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resourceType"], "Patient");
    assert_eq!(body["id"], "pat-123");
    assert_eq!(body["active"], true);
    assert_eq!(body["identifier"][0]["system"], MRN);
    assert_eq!(body["identifier"][0]["value"], "123456");
    assert_eq!(body["name"][0]["family"], "Fitzgerald");
    assert_eq!(body["gender"], "female");
    assert_eq!(body["birthDate"], "1980-12-01");
}

#[tokio::test]
async fn read_unknown_id_is_not_found_outcome() {
    let app = app();
    let (status, body) = get(&app, "/Patient/does-not-exist", Some(TOKEN)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["resourceType"], "OperationOutcome");
    assert_eq!(body["issue"][0]["severity"], "error");
    assert_eq!(body["issue"][0]["code"], "not-found");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_wrong_credentials() {
    let app = app();

    for uri in ["/Patient/pat-123", "/Patient?identifier=123456"] {
        let (status, body) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} without token");
        assert_eq!(body["resourceType"], "OperationOutcome");
        assert_eq!(body["issue"][0]["code"], "login");

        let (status, _) = get(&app, uri, Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} with wrong token");
    }
}

#[tokio::test]
async fn unknown_id_without_credentials_is_unauthorized_not_not_found() {
    let app = app();
    let (status, _) = get(&app, "/Patient/does-not-exist", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_schemes_are_rejected() {
    let app = app();
    let request = Request::builder()
        .uri("/Patient/pat-123")
        .header(header::AUTHORIZATION, format!("Basic {TOKEN}"))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn search_by_bare_mrn() {
    let app = app();
    let (status, body) = get(&app, "/Patient?identifier=123456", Some(TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resourceType"], "Bundle");
    assert_eq!(body["type"], "searchset");
    assert_eq!(body["total"], 1);
    assert_eq!(entry_ids(&body), vec!["pat-123"]);
    assert_eq!(body["entry"][0]["fullUrl"], format!("{BASE_URL}/Patient/pat-123"));
    assert_eq!(body["entry"][0]["search"]["mode"], "match");
}

#[tokio::test]
async fn search_by_encoded_system_and_value() {
    let app = app();
    let uri = "/Patient?identifier=http%3A%2F%2Fhospital.example.org%2Fmrn%7C654321";
    let (status, body) = get(&app, uri, Some(TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(entry_ids(&body), vec!["pat-654"]);
}

#[tokio::test]
async fn search_ignores_foreign_system_by_default() {
    let app = app();
    let (_, body) = get(&app, "/Patient?identifier=urn%3Aother%7C123456", Some(TOKEN)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(entry_ids(&body), vec!["pat-123"]);
}

#[tokio::test]
async fn search_enforces_system_when_configured() {
    let patients = seed::default_patients(MRN).expect("default seed");
    let app = app_with(IdentifierSystemPolicy::Enforce, patients);

    let (_, body) = get(&app, "/Patient?identifier=urn%3Aother%7C123456", Some(TOKEN)).await;
    assert_eq!(body["total"], 0);

    let (_, body) = get(&app, "/Patient?identifier=123456", Some(TOKEN)).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn search_without_identifier_is_empty() {
    let app = app();
    let (status, body) = get(&app, "/Patient", Some(TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["entry"], serde_json::json!([]));

    let (_, body) = get(&app, "/Patient?name=Fitzgerald", Some(TOKEN)).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn repeated_identifiers_dedupe_by_patient() {
    let app = app();
    let uri = "/Patient?identifier=123456&identifier=http%3A%2F%2Fhospital.example.org%2Fmrn%7C123456";
    let (_, body) = get(&app, uri, Some(TOKEN)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(entry_ids(&body), vec!["pat-123"]);

    let uri = "/Patient?identifier=654321&identifier=nope&identifier=123456";
    let (_, body) = get(&app, uri, Some(TOKEN)).await;
    assert_eq!(body["total"], 2);
    assert_eq!(entry_ids(&body), vec!["pat-654", "pat-123"]);
}

#[tokio::test]
async fn injected_seed_set_is_served() {
    let patient = PatientResource::new(NonEmptyText::new("custom-1").expect("id"))
        .with_identifier(None, "A-1")
        .with_identifier(Some("http://ssn.example.org"), "SSN-1");
    let app = app_with(IdentifierSystemPolicy::Ignore, vec![patient]);

    let (_, body) = get(&app, "/Patient?identifier=A-1", Some(TOKEN)).await;
    assert_eq!(entry_ids(&body), vec!["custom-1"]);

    let (_, body) = get(&app, "/Patient?identifier=SSN-1", Some(TOKEN)).await;
    assert_eq!(body["total"], 0);

    let (status, _) = get(&app, "/Patient/pat-123", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_returns_elements_beyond_the_typed_fields() {
    let seed = r#"[{
        "resourceType": "Patient",
        "id": "rich-1",
        "identifier": [{ "use": "usual", "value": "R-1" }],
        "name": [{ "text": "Jane Doe" }],
        "telecom": [{ "system": "email", "value": "jane@example.org" }]
    }]"#;
    let patients = PatientResource::list_from_json_str(seed).expect("seed");
    let app = app_with(IdentifierSystemPolicy::Ignore, patients);

    let (status, body) = get(&app, "/Patient/rich-1", Some(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"][0]["text"], "Jane Doe");
    assert_eq!(body["telecom"][0]["value"], "jane@example.org");
    assert_eq!(body["identifier"][0]["use"], "usual");

    let (_, body) = get(&app, "/Patient?identifier=R-1", Some(TOKEN)).await;
    assert_eq!(body["entry"][0]["resource"]["telecom"][0]["system"], "email");
}

#[tokio::test]
async fn discovery_endpoints_are_open() {
    let app = app();

    let (status, body) = get(&app, "/.well-known/smart-configuration", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issuer"], AUTH_URL);
    assert_eq!(body["authorization_endpoint"], format!("{AUTH_URL}/oauth2/authorize"));
    assert_eq!(body["token_endpoint"], format!("{AUTH_URL}/oauth2/token"));
    assert_eq!(body["grant_types_supported"][2], "client_credentials");

    let (status, body) = get(&app, "/metadata", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resourceType"], "CapabilityStatement");
    assert_eq!(body["rest"][0]["resource"][0]["type"], "Patient");
    assert!(body["date"].is_string());
}

#[tokio::test]
async fn index_lists_example_urls() {
    let app = app();
    let (status, body) = get(&app, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "SMART-on-FHIR stub is running");
    assert_eq!(body["wellKnown"], format!("{BASE_URL}/.well-known/smart-configuration"));
    assert_eq!(body["metadata"], format!("{BASE_URL}/metadata"));
    assert_eq!(body["samplePatientById"], format!("{BASE_URL}/Patient/pat-123"));
    assert_eq!(
        body["exampleSearchByMrn"][0],
        format!("{BASE_URL}/Patient?identifier=http%3A%2F%2Fhospital.example.org%2Fmrn|123456")
    );
    assert_eq!(
        body["exampleSearchByMrn"][1],
        format!("{BASE_URL}/Patient?identifier=654321")
    );
    assert_eq!(
        body["tokenHint"],
        format!("POST {AUTH_URL}/oauth2/token to get a bearer token")
    );
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app();

    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, body) = get(&app, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/Patient/{id}"].is_object());
}
