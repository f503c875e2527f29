//! The patient document and its write payloads.
//!
//! [`Patient`] is the stored shape. [`NewPatient`] and [`PatientUpdate`] are what callers submit;
//! both are deliberately loose (everything optional) so that missing required fields surface as
//! [`PatientError::Validation`] with a useful message rather than as a deserialisation failure.
//!
//! Normalisation happens here, at the persistence boundary:
//! - `firstName`, `lastName` and the two reference URLs are trimmed and must be non-empty
//! - `email` is trimmed, lowercased and must be non-empty
//! - `modelConfidence`, when present, must lie in `[0, 1]`
//!
//! `id` and `createdAt` are assigned by the store and have no counterpart in [`PatientUpdate`],
//! so an update can never change them.

use crate::error::{PatientError, PatientResult};
use chrono::{DateTime, Utc};
use medboard_types::{EmailAddress, NonEmptyText};
use medboard_uuid::PatientId;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Stored diagnosis workflow status.
///
/// Independent of the derived pending/confirmed classification, which only looks at
/// `modelResult` (see [`crate::views`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl DiagnosisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisStatus::Pending => "pending",
            DiagnosisStatus::Confirmed => "confirmed",
            DiagnosisStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DiagnosisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiagnosisStatus {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(DiagnosisStatus::Pending),
            "confirmed" => Ok(DiagnosisStatus::Confirmed),
            "cancelled" => Ok(DiagnosisStatus::Cancelled),
            other => Err(PatientError::Validation(format!(
                "unknown status '{other}' (expected pending, confirmed or cancelled)"
            ))),
        }
    }
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[schema(value_type = String, example = "550e8400e29b41d4a716446655440000")]
    pub id: PatientId,
    #[schema(value_type = String)]
    pub first_name: NonEmptyText,
    #[schema(value_type = String)]
    pub last_name: NonEmptyText,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_confidence: Option<f64>,
    #[serde(default)]
    pub status: DiagnosisStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub audio_file_url: NonEmptyText,
    #[schema(value_type = String)]
    pub video_file_url: NonEmptyText,
}

impl Patient {
    /// Builds a new record from a creation payload.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] naming every missing required field, or describing
    /// an out-of-range `modelConfidence`.
    pub fn from_new(
        id: PatientId,
        created_at: DateTime<Utc>,
        new: NewPatient,
    ) -> PatientResult<Self> {
        let mut missing = Vec::new();
        let first_name = required_text(new.first_name, "firstName", &mut missing);
        let last_name = required_text(new.last_name, "lastName", &mut missing);
        let email = new
            .email
            .and_then(|e| EmailAddress::parse(e).ok())
            .or_else(|| {
                missing.push("email");
                None
            });
        let audio_file_url = required_text(new.audio_file_url, "audioFileUrl", &mut missing);
        let video_file_url = required_text(new.video_file_url, "videoFileUrl", &mut missing);

        let (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(audio_file_url),
            Some(video_file_url),
        ) = (first_name, last_name, email, audio_file_url, video_file_url)
        else {
            return Err(PatientError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        };

        validate_confidence(new.model_confidence)?;

        Ok(Self {
            id,
            first_name,
            last_name,
            email,
            phone: new.phone,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            address: new.address,
            medical_history: new.medical_history,
            allergies: new.allergies,
            medications: new.medications,
            model_result: new.model_result,
            model_confidence: new.model_confidence,
            status: new.status.unwrap_or_default(),
            created_at,
            last_visit: new.last_visit,
            notes: new.notes,
            audio_file_url,
            video_file_url,
        })
    }

    /// Applies a partial update in place.
    ///
    /// Fields absent from `update` are left unchanged; optional fields sent as `null` are
    /// cleared. All validation runs before any field is touched, so a failed update leaves the
    /// record as it was.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] if a supplied required field is blank or `null`, or if
    /// `modelConfidence` is out of range.
    pub fn apply(&mut self, update: PatientUpdate) -> PatientResult<()> {
        let first_name = update
            .first_name
            .map(|v| present_text(v.unwrap_or_default(), "firstName"))
            .transpose()?;
        let last_name = update
            .last_name
            .map(|v| present_text(v.unwrap_or_default(), "lastName"))
            .transpose()?;
        let email = update
            .email
            .map(|v| {
                EmailAddress::parse(v.unwrap_or_default())
                    .map_err(|_| PatientError::Validation("email cannot be empty".into()))
            })
            .transpose()?;
        let audio_file_url = update
            .audio_file_url
            .map(|v| present_text(v.unwrap_or_default(), "audioFileUrl"))
            .transpose()?;
        let video_file_url = update
            .video_file_url
            .map(|v| present_text(v.unwrap_or_default(), "videoFileUrl"))
            .transpose()?;
        if let Some(confidence) = update.model_confidence {
            validate_confidence(confidence)?;
        }

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = audio_file_url {
            self.audio_file_url = v;
        }
        if let Some(v) = video_file_url {
            self.video_file_url = v;
        }
        if let Some(v) = update.phone {
            self.phone = v;
        }
        if let Some(v) = update.date_of_birth {
            self.date_of_birth = v;
        }
        if let Some(v) = update.gender {
            self.gender = v;
        }
        if let Some(v) = update.address {
            self.address = v;
        }
        if let Some(v) = update.medical_history {
            self.medical_history = v;
        }
        if let Some(v) = update.allergies {
            self.allergies = v.unwrap_or_default();
        }
        if let Some(v) = update.medications {
            self.medications = v.unwrap_or_default();
        }
        if let Some(v) = update.model_result {
            self.model_result = v;
        }
        if let Some(v) = update.model_confidence {
            self.model_confidence = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
        if let Some(v) = update.last_visit {
            self.last_visit = v;
        }
        if let Some(v) = update.notes {
            self.notes = v;
        }

        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Creation payload. Required fields are optional here so that their absence can be reported
/// as a validation failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DiagnosisStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_url: Option<String>,
}

/// Partial update payload.
///
/// Outer `None` means "leave unchanged". For optional fields the inner `Option` carries an
/// explicit `null`, which clears the stored value. Unknown keys (including `id` and
/// `createdAt`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub date_of_birth: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub medical_history: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>, nullable)]
    pub allergies: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>, nullable)]
    pub medications: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub model_result: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, nullable)]
    pub model_confidence: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DiagnosisStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime, nullable)]
    pub last_visit: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub audio_file_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub video_file_url: Option<Option<String>>,
}

impl PatientUpdate {
    /// An update that only sets `modelResult`.
    pub fn diagnosis(model_result: impl Into<String>) -> Self {
        Self {
            model_result: Some(Some(model_result.into())),
            ..Self::default()
        }
    }
}

/// A present key deserialises to `Some(value)`, where `value` may itself be `None` for `null`.
/// Combined with `#[serde(default)]` an absent key stays `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts `null` for a list and reads it as empty, matching how updates treat it.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<NonEmptyText> {
    let text = value.and_then(|v| NonEmptyText::new(v).ok());
    if text.is_none() {
        missing.push(field);
    }
    text
}

fn present_text(value: String, field: &str) -> PatientResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|_| PatientError::Validation(format!("{field} cannot be empty")))
}

fn validate_confidence(value: Option<f64>) -> PatientResult<()> {
    match value {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(PatientError::Validation(format!(
            "modelConfidence must be between 0 and 1, got {c}"
        ))),
        _ => Ok(()),
    }
}
