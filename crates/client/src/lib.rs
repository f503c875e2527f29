//! # MedBoard Client
//!
//! Client-side access to the MedBoard REST API.
//!
//! - [`PatientGateway`]: HTTP calls plus the locally held dashboard list and detail record
//! - [`notify`]: success/error notifications delivered through an injected [`Notifier`]
//! - [`display`]: formatting helpers for phone numbers, names, ages and dates
//!
//! Filtering and dashboard statistics are pure functions over the fetched list and live in
//! `medboard_core::views`.

pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod notify;

pub use config::{GatewayConfig, DEFAULT_API_URL};
pub use error::{GatewayError, GatewayResult};
pub use gateway::PatientGateway;
pub use notify::{Notifier, Toast, ToastChannel, ToastVariant};
