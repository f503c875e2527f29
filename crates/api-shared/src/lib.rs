//! # API Shared
//!
//! Wire types shared by the MedBoard REST server and its clients.
//!
//! Contains:
//! - The response envelope every patient endpoint returns ([`ApiResponse`])
//! - Shared services like [`HealthService`]
//!
//! Used by `api-rest` to produce responses and by `medboard-client` to decode them.

pub mod envelope;
pub mod health;

pub use envelope::{ApiResponse, MessageRes, PatientListRes, PatientRes};
pub use health::{HealthRes, HealthService};

/// Message returned by a successful delete.
pub const PATIENT_DELETED_MESSAGE: &str = "Patient deleted";
