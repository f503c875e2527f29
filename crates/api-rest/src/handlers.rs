use crate::error::ApiError;
use crate::AppState;
use api_shared::{
    ApiResponse, HealthRes, HealthService, MessageRes, PatientListRes, PatientRes,
    PATIENT_DELETED_MESSAGE,
};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use medboard_core::{NewPatient, Patient, PatientError, PatientUpdate};

/// Logs a failed patient operation and converts it for the response.
fn log_failure(operation: &'static str) -> impl FnOnce(PatientError) -> ApiError {
    move |e| {
        tracing::error!("{} error: {:?}", operation, e);
        ApiError::from(e)
    }
}

/// Readiness probe served at `/`.
#[axum::debug_handler]
pub async fn root() -> &'static str {
    "server is ready"
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
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All stored patients", body = PatientListRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// List every stored patient.
///
/// Order is unspecified; clients sort or filter as they need.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Patient>>>, ApiError> {
    let patients = state
        .repository
        .list()
        .map_err(log_failure("List patients"))?;
    Ok(Json(ApiResponse::data(patients)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 404, description = "Invalid identifier or no such patient", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Fetch one patient by identifier.
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ApiResponse<Patient>>, ApiError> {
    let patient = state
        .repository
        .get_by_id(&id)
        .map_err(log_failure("Get patient"))?;
    Ok(Json(ApiResponse::data(patient)))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes),
        (status = 500, description = "Duplicate email or internal error", body = MessageRes)
    )
)]
/// Create a patient record.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not valid JSON or a required field is missing,
/// and `500 Internal Server Error` if the email is already taken or storage fails.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Patient>>), ApiError> {
    let Json(new) = payload?;
    let patient = state
        .repository
        .create(new)
        .map_err(log_failure("Create patient"))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(patient))))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 400, description = "Invalid field values", body = MessageRes),
        (status = 404, description = "Invalid identifier or no such patient", body = MessageRes),
        (status = 500, description = "Duplicate email or internal error", body = MessageRes)
    )
)]
/// Partially update a patient.
///
/// Only the fields present in the body change; an explicit `null` clears an optional field.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    payload: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Patient>>, ApiError> {
    let Json(update) = payload?;
    let patient = state
        .repository
        .update(&id, update)
        .map_err(log_failure("Update patient"))?;
    Ok(Json(ApiResponse::data(patient)))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient deleted (also when it did not exist)", body = MessageRes),
        (status = 404, description = "Invalid identifier", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Delete a patient. Deleting an unknown but well-formed id still succeeds.
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state
        .repository
        .delete(&id)
        .map_err(log_failure("Delete patient"))?;
    Ok(Json(ApiResponse::message(PATIENT_DELETED_MESSAGE)))
}
