use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use stub_core::{CoreConfig, seed};

/// Main entry point for the SMART-on-FHIR stub
///
/// Resolves configuration from the environment (and `.env`), seeds the patient registry and
/// serves the REST API until Ctrl-C.
///
/// # Environment Variables
/// - `BEARER_TOKEN`: credential required on the `Patient` routes (required)
/// - `HOST` / `PORT`: listen address (default: "0.0.0.0:9000")
/// - `BASE_URL`: public base URL used in links (default: "http://localhost:{PORT}")
/// - `AUTH_SERVER_BASE_URL`: authorization server advertised in discovery (default: `BASE_URL`)
/// - `MRN_SYSTEM`: identifier system of the hospital MRN
/// - `ENFORCE_IDENTIFIER_SYSTEM`: reject searches asserting a foreign system (default: false)
/// - `PATIENT_SEED_FILE`: JSON array of Patient resources replacing the demo patients
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, seeding or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smart_stub_run=info".parse()?)
                .add_directive("stub_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env()?);
    let registry = Arc::new(seed::build_registry(&cfg)?);

    tracing::info!("++ Starting SMART-on-FHIR stub on {}", cfg.listen_addr());
    tracing::info!("Base URL: {}", cfg.base_url());
    tracing::info!("MRN system: {}", cfg.mrn_system());
    tracing::info!("Auth server: {}", cfg.auth_server_base_url());
    tracing::info!("Serving {} patients", registry.len());

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr()).await?;
    api_rest::serve(listener, AppState::new(cfg, registry)).await
}
