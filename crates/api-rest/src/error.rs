//! Mapping of core failures onto HTTP responses.
//!
//! Every failure leaves as `{success: false, message}`. The message is fixed per error class;
//! the underlying [`PatientError`] is logged by the handler, never sent to the caller.

use api_shared::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medboard_core::{ErrorKind, PatientError};

pub const INVALID_ID_MESSAGE: &str = "Invalid Patient Id";
pub const NOT_FOUND_MESSAGE: &str = "Patient not found";
pub const CONFLICT_MESSAGE: &str = "A patient with this email already exists";
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid patient id")]
    InvalidId,
    #[error("Patient not found")]
    NotFound,
    #[error("Email already in use")]
    Conflict,
    #[error("Internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidId | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(detail) => detail.clone(),
            ApiError::InvalidId => INVALID_ID_MESSAGE.into(),
            ApiError::NotFound => NOT_FOUND_MESSAGE.into(),
            ApiError::Conflict => CONFLICT_MESSAGE.into(),
            ApiError::Internal => SERVER_ERROR_MESSAGE.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message());
        (self.status(), Json(body)).into_response()
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err.kind() {
            ErrorKind::Validation => match err {
                PatientError::Validation(detail) => ApiError::BadRequest(detail),
                other => ApiError::BadRequest(other.to_string()),
            },
            ErrorKind::InvalidIdentifier => ApiError::InvalidId,
            ErrorKind::NotFound => ApiError::NotFound,
            ErrorKind::Conflict => ApiError::Conflict,
            ErrorKind::Server => ApiError::Internal,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medboard_core::PatientId;

    #[test]
    fn test_error_kinds_map_to_documented_statuses() {
        let cases = [
            (
                PatientError::Validation("missing required fields: email".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PatientError::InvalidIdentifier(PatientId::parse("nope").unwrap_err()),
                StatusCode::NOT_FOUND,
            ),
            (
                PatientError::NotFound(PatientId::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                PatientError::Conflict("a@x.com".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (PatientError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_validation_detail_is_passed_through() {
        let err = ApiError::from(PatientError::Validation("firstName cannot be empty".into()));
        assert_eq!(err.message(), "firstName cannot be empty");
    }

    #[test]
    fn test_server_error_hides_detail() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = ApiError::from(PatientError::FileWrite(io));
        assert_eq!(err.message(), SERVER_ERROR_MESSAGE);
    }
}
