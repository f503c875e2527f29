//! Patient identifiers and sharded-path utilities.
//!
//! MedBoard stores each patient document under a sharded directory derived from its identifier.
//!
//! Identifiers use a *canonical* UUID representation: **32 lowercase hexadecimal characters**
//! (no hyphens). The canonical form doubles as the well-formedness rule for identifiers that
//! arrive from outside the core (REST path segments, CLI arguments): anything else is rejected
//! before the store is consulted.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, records live under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `patient_data/patients/55/0e/550e8400e29b41d4a716446655440000/`

mod patient_id;

pub use patient_id::{PatientId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// The supplied string is not a canonical identifier.
    #[error("Invalid identifier: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
