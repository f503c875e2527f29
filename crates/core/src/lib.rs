//! # MedBoard Core
//!
//! Core business logic for the MedBoard patient record service.
//!
//! This crate contains pure data operations and storage:
//! - The patient document model and its validation rules ([`model`])
//! - A sharded, file-backed JSON document store ([`store`])
//! - CRUD primitives with identity and existence checks ([`repository`])
//! - Derived dashboard views: search, status/tab filters, stats ([`views`])
//! - Ordered list editing for allergies and medications ([`entries`])
//!
//! **No API concerns**: HTTP servers and wire envelopes belong in `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod entries;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;
pub mod views;

pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use error::{ErrorKind, PatientError, PatientResult};
pub use medboard_types::{EmailAddress, NonEmptyText, TextError};
pub use medboard_uuid::PatientId;
pub use model::{DiagnosisStatus, NewPatient, Patient, PatientUpdate};
pub use repository::PatientRepository;
pub use views::{DashboardStats, StatusFilter, TabFilter, ViewQuery};
