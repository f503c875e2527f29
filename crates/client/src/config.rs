//! Gateway configuration.
//!
//! The base URL is resolved once, at startup, and handed to [`crate::PatientGateway::new`].
//! Request handling never reads the environment.

use crate::error::{GatewayError, GatewayResult};
use medboard_core::PatientId;
use reqwest::Url;

/// Base URL used when `MEDBOARD_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    base_url: Url,
}

impl GatewayConfig {
    /// Validates and stores the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if the value is empty, does not parse, or is not
    /// an http(s) URL.
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let invalid = || GatewayError::InvalidBaseUrl(base_url.to_string());

        if trimmed.is_empty() {
            return Err(invalid());
        }
        let base_url = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(Self { base_url })
    }

    /// Resolves the base URL from an optional environment value, falling back to
    /// [`DEFAULT_API_URL`] when unset or blank.
    pub fn from_env_value(value: Option<String>) -> GatewayResult<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::new(&v),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn patients_url(&self) -> String {
        format!("{}/patients", self.base_url.as_str().trim_end_matches('/'))
    }

    pub(crate) fn patient_url(&self, id: &PatientId) -> String {
        format!("{}/{}", self.patients_url(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_http_and_strips_trailing_slash() {
        let cfg = GatewayConfig::new("http://localhost:5001/").unwrap();
        assert_eq!(cfg.patients_url(), "http://localhost:5001/patients");
    }

    #[test]
    fn test_new_keeps_path_prefix() {
        let cfg = GatewayConfig::new("https://records.example/api").unwrap();
        assert_eq!(cfg.patients_url(), "https://records.example/api/patients");
    }

    #[test]
    fn test_new_rejects_invalid_urls() {
        for bad in ["", "   ", "localhost:5001", "ftp://host", "not a url"] {
            assert!(
                matches!(GatewayConfig::new(bad), Err(GatewayError::InvalidBaseUrl(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_from_env_value_defaults() {
        let cfg = GatewayConfig::from_env_value(None).unwrap();
        assert_eq!(cfg.patients_url(), "http://localhost:5001/patients");

        let cfg = GatewayConfig::from_env_value(Some("  ".into())).unwrap();
        assert_eq!(cfg.patients_url(), "http://localhost:5001/patients");
    }

    #[test]
    fn test_patient_url_uses_canonical_id() {
        let cfg = GatewayConfig::new("http://localhost:5001").unwrap();
        let id = PatientId::parse("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(
            cfg.patient_url(&id),
            "http://localhost:5001/patients/0123456789abcdef0123456789abcdef"
        );
    }
}
