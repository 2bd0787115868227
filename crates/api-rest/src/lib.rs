//! # API REST
//!
//! REST API implementation for the SMART-on-FHIR stub.
//!
//! Handles:
//! - HTTP endpoints with axum (discovery documents, `Patient` read and search)
//! - The bearer-token gate in front of the `Patient` routes
//! - OperationOutcome error bodies
//! - OpenAPI/Swagger documentation, CORS and request tracing
//!
//! Uses `stub-core` for the registry and `api-shared` for credential checks.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;
mod middleware;

pub use error::ApiError;
pub use handlers::ServiceIndex;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use stub_core::{CoreConfig, PatientRegistry, PatientService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
///
/// Holds the patient service, which in turn owns the configuration and the seeded registry.
#[derive(Clone)]
pub struct AppState {
    patient_service: PatientService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, registry: Arc<PatientRegistry>) -> Self {
        Self {
            patient_service: PatientService::new(cfg, registry),
        }
    }

    pub fn patient_service(&self) -> &PatientService {
        &self.patient_service
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index,
        handlers::health,
        handlers::smart_configuration,
        handlers::metadata,
        handlers::read_patient,
        handlers::search_patients,
    ),
    components(schemas(
        api_shared::HealthRes,
        handlers::ServiceIndex,
        fhir::SmartConfiguration,
        fhir::PatientResource,
        fhir::Identifier,
        fhir::Bundle,
        fhir::BundleEntry,
        fhir::BundleEntrySearch,
        fhir::BundleType,
        fhir::SearchEntryMode,
        fhir::OperationOutcome,
        fhir::OperationOutcomeIssue,
        fhir::IssueSeverity,
        fhir::IssueType,
    ))
)]
struct ApiDoc;

/// Build the full router.
///
/// `/Patient` and `/Patient/:id` sit behind the bearer gate; discovery, index and health
/// routes are open.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/Patient", get(handlers::search_patients))
        .route("/Patient/:id", get(handlers::read_patient))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_bearer));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/.well-known/smart-configuration",
            get(handlers::smart_configuration),
        )
        .route("/metadata", get(handlers::metadata))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the router on `listener` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the HTTP server fails while running.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
