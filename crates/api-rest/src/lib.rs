//! # API REST
//!
//! REST API implementation for MedBoard.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, status codes, CORS)
//!
//! Uses `api-shared` for the response envelope and `medboard-core` for storage.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use api_shared::{HealthRes, MessageRes, PatientListRes, PatientRes};
use axum::{routing::get, Router};
use medboard_core::{DiagnosisStatus, NewPatient, Patient, PatientRepository, PatientUpdate};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state for the REST API server
///
/// Shared by every request handler. The repository is cheap to clone and serialises its own
/// writes, so no extra locking is needed here.
#[derive(Clone, Debug)]
pub struct AppState {
    pub repository: PatientRepository,
}

impl AppState {
    pub fn new(repository: PatientRepository) -> Self {
        Self { repository }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::get_patient,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
    ),
    components(schemas(
        Patient,
        NewPatient,
        PatientUpdate,
        DiagnosisStatus,
        PatientRes,
        PatientListRes,
        MessageRes,
        HealthRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router, Swagger UI and CORS included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on an already-bound listener until the server stops.
///
/// # Errors
/// Returns an error if the HTTP server fails while running.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("-- MedBoard REST API listening on {}", addr);
    }
    axum::serve(listener, router(state)).await
}
