use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use medboard_core::config::patient_data_dir_from_env_value;
use medboard_core::{CoreConfig, PatientRepository};

/// Default bind address for the REST server.
const DEFAULT_REST_ADDR: &str = "0.0.0.0:5001";

/// Main entry point for the MedBoard application
///
/// Resolves configuration once, makes sure the patient data directory exists and serves the
/// REST API (with Swagger UI) until the process is stopped.
///
/// # Environment Variables
/// - `MEDBOARD_REST_ADDR`: REST server address (default: "0.0.0.0:5001")
/// - `PATIENT_DATA_DIR`: Directory for patient data storage (default: "patient_data")
/// - `RUST_LOG`: Extra tracing directives
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the patient data directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medboard_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medboard_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDBOARD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let patient_data_dir = patient_data_dir_from_env_value(std::env::var("PATIENT_DATA_DIR").ok());

    if !patient_data_dir.exists() {
        tracing::info!(
            "Creating patient data directory: {}",
            patient_data_dir.display()
        );
        std::fs::create_dir_all(&patient_data_dir)?;
    }

    let cfg = Arc::new(CoreConfig::new(patient_data_dir)?);
    let state = AppState::new(PatientRepository::new(cfg));

    tracing::info!("++ Starting MedBoard REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    api_rest::serve(listener, state).await?;

    Ok(())
}
