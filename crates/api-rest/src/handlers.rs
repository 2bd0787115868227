use crate::{ApiError, AppState};
use api_shared::{HealthRes, HealthService};
use axum::extract::{Path, Query, State};
use axum::response::Json;
use fhir::smart::TOKEN_PATH;
use fhir::{Bundle, PatientResource, SmartConfiguration};
use serde::Serialize;
use stub_core::PatientService;
use utoipa::ToSchema;

/// Query parameter name for identifier search.
const IDENTIFIER_PARAM: &str = "identifier";

/// Human-readable map of the server's endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIndex {
    pub message: String,
    pub well_known: String,
    pub metadata: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_patient_by_id: Option<String>,
    pub example_search_by_mrn: Vec<String>,
    pub token_hint: String,
}

impl ServiceIndex {
    /// Build the index, taking sample URLs from the first seeded patients.
    fn for_service(svc: &PatientService) -> Self {
        let cfg = svc.cfg();
        let base = cfg.base_url();
        let registry = svc.registry();

        // (patient id, searchable identifier value) for the first two patients.
        let samples: Vec<(&str, Option<&str>)> = registry
            .patients()
            .take(2)
            .map(|patient| {
                let mrn = patient
                    .identifier
                    .iter()
                    .map(|identifier| identifier.value.as_str())
                    .find(|value| {
                        registry
                            .find_by_identifier_value(value)
                            .is_some_and(|found| found.id() == patient.id())
                    });
                (patient.id(), mrn)
            })
            .collect();

        let sample_patient_by_id = samples
            .first()
            .map(|(id, _)| format!("{base}/Patient/{id}"));

        let mut example_search_by_mrn = Vec::new();
        if let Some((_, Some(mrn))) = samples.first() {
            let system: String =
                url::form_urlencoded::byte_serialize(cfg.mrn_system().as_bytes()).collect();
            example_search_by_mrn.push(format!("{base}/Patient?identifier={system}|{mrn}"));
        }
        if let Some((_, Some(mrn))) = samples.last() {
            example_search_by_mrn.push(format!("{base}/Patient?identifier={mrn}"));
        }

        Self {
            message: "SMART-on-FHIR stub is running".into(),
            well_known: format!("{base}/.well-known/smart-configuration"),
            metadata: format!("{base}/metadata"),
            sample_patient_by_id,
            example_search_by_mrn,
            token_hint: format!(
                "POST {}{TOKEN_PATH} to get a bearer token",
                cfg.auth_server_base_url()
            ),
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Index of available endpoints", body = ServiceIndex)
    )
)]
/// Index of the available endpoints with ready-to-use example URLs.
#[axum::debug_handler]
pub(crate) async fn index(State(state): State<AppState>) -> Json<ServiceIndex> {
    Json(ServiceIndex::for_service(state.patient_service()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(
        state.patient_service().registry().len(),
    ))
}

#[utoipa::path(
    get,
    path = "/.well-known/smart-configuration",
    responses(
        (status = 200, description = "SMART discovery document", body = SmartConfiguration)
    )
)]
#[axum::debug_handler]
pub(crate) async fn smart_configuration(
    State(state): State<AppState>,
) -> Json<SmartConfiguration> {
    Json(state.patient_service().smart_configuration())
}

#[utoipa::path(
    get,
    path = "/metadata",
    responses(
        (status = 200, description = "CapabilityStatement for this server")
    )
)]
#[axum::debug_handler]
pub(crate) async fn metadata(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.patient_service().capability_statement())
}

#[utoipa::path(
    get,
    path = "/Patient/{id}",
    params(
        ("id" = String, Path, description = "Patient resource id")
    ),
    responses(
        (status = 200, description = "Patient resource", body = PatientResource),
        (status = 401, description = "Missing or invalid bearer token", body = fhir::OperationOutcome),
        (status = 404, description = "No patient with this id", body = fhir::OperationOutcome)
    )
)]
/// Read a patient by resource id.
///
/// # Errors
/// Returns `404 Not Found` with an OperationOutcome if the id is not in the registry.
#[axum::debug_handler]
pub(crate) async fn read_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientResource>, ApiError> {
    match state.patient_service().read_patient(&id) {
        Ok(patient) => Ok(Json(patient)),
        Err(e) => {
            tracing::debug!("Read patient error: {e}");
            Err(ApiError::NotFound(id))
        }
    }
}

#[utoipa::path(
    get,
    path = "/Patient",
    params(
        ("identifier" = Option<Vec<String>>, Query,
            description = "MRN as `value` or `system|value`; repeat to search several")
    ),
    responses(
        (status = 200, description = "Searchset bundle of matching patients", body = Bundle),
        (status = 401, description = "Missing or invalid bearer token", body = fhir::OperationOutcome)
    )
)]
/// Search patients by identifier.
///
/// Every `identifier` parameter is considered, in order. Without any, the bundle is empty.
#[axum::debug_handler]
pub(crate) async fn search_patients(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Bundle> {
    let identifiers: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == IDENTIFIER_PARAM)
        .map(|(_, value)| value.as_str())
        .collect();

    Json(state.patient_service().search_patients(identifiers.as_slice()))
}
