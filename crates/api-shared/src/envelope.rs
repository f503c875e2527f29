//! The `{success, data | message}` response envelope.
//!
//! A response carries exactly one of `data` (successful reads and writes) or `message`
//! (successful delete, or any failure). The constructors are the only way the server builds an
//! envelope, which keeps that rule in one place.

use medboard_core::Patient;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(PatientRes = ApiResponse<Patient>, PatientListRes = ApiResponse<Vec<Patient>>, MessageRes = ApiResponse<String>)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Splits the envelope into its payload or its failure message.
    ///
    /// A `success: false` envelope, or a successful one without `data`, yields `Err` with the
    /// carried message (empty if none was sent).
    pub fn into_data(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message.unwrap_or_default()),
        }
    }
}
