//! Patient CRUD primitives.
//!
//! The repository owns identity checks (an identifier must be canonical before the store is
//! consulted) and existence checks. It knows nothing about transport framing; the REST layer
//! maps its typed errors onto status codes.

use crate::config::CoreConfig;
use crate::error::{PatientError, PatientResult};
use crate::model::{NewPatient, Patient, PatientUpdate};
use crate::store::PatientStore;
use chrono::Utc;
use medboard_uuid::PatientId;
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientRepository {
    store: Arc<PatientStore>,
}

impl PatientRepository {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: Arc::new(PatientStore::new(&cfg)),
        }
    }

    /// Returns every patient. No ordering is guaranteed.
    pub fn list(&self) -> PatientResult<Vec<Patient>> {
        self.store.list()
    }

    /// Fetches one patient.
    ///
    /// # Errors
    ///
    /// - [`PatientError::InvalidIdentifier`] if `id` is not canonical
    /// - [`PatientError::NotFound`] if no record exists for `id`
    pub fn get_by_id(&self, id: &str) -> PatientResult<Patient> {
        let id = PatientId::parse(id)?;
        self.store.load(&id)?.ok_or(PatientError::NotFound(id))
    }

    /// Creates a patient, assigning its `id` and `createdAt`.
    ///
    /// # Errors
    ///
    /// - [`PatientError::Validation`] if required fields are missing or blank
    /// - [`PatientError::Conflict`] if the email is already in use
    pub fn create(&self, new: NewPatient) -> PatientResult<Patient> {
        let patient = Patient::from_new(PatientId::new(), Utc::now(), new)?;
        self.store.insert(&patient)?;
        tracing::info!(patient_id = %patient.id, "patient created");
        Ok(patient)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// # Errors
    ///
    /// - [`PatientError::InvalidIdentifier`] if `id` is not canonical
    /// - [`PatientError::NotFound`] if no record exists for `id`
    /// - [`PatientError::Validation`] if the update would blank a required field
    /// - [`PatientError::Conflict`] if the new email belongs to another patient
    pub fn update(&self, id: &str, update: PatientUpdate) -> PatientResult<Patient> {
        let id = PatientId::parse(id)?;
        self.store
            .modify(&id, |patient| patient.apply(update))?
            .ok_or(PatientError::NotFound(id))
    }

    /// Deletes a patient.
    ///
    /// Existence is not checked: deleting a well-formed identifier with no record succeeds.
    ///
    /// # Errors
    ///
    /// - [`PatientError::InvalidIdentifier`] if `id` is not canonical
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let id = PatientId::parse(id)?;
        self.store.remove(&id)?;
        tracing::info!(patient_id = %id, "patient deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::DiagnosisStatus;
    use crate::test_support::{new_patient, test_cfg};
    use crate::views::{compute_stats, DashboardStats};
    use std::fs;
    use tempfile::TempDir;

    fn repo(temp_dir: &TempDir) -> PatientRepository {
        PatientRepository::new(Arc::new(test_cfg(temp_dir.path())))
    }

    #[test]
    fn test_create_then_get_round_trips_submitted_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        let mut new = new_patient("Ann", "Lee", "a@x.com");
        new.phone = Some("5551234567".into());
        new.allergies = vec!["Peanuts".into(), "Latex".into()];
        new.model_confidence = Some(0.82);

        let created = repo.create(new.clone()).expect("create should succeed");
        let fetched = repo
            .get_by_id(&created.id.to_string())
            .expect("id should be usable immediately");

        assert_eq!(fetched, created);
        assert_eq!(fetched.first_name.as_str(), "Ann");
        assert_eq!(fetched.phone, new.phone);
        assert_eq!(fetched.allergies, new.allergies);
        assert_eq!(fetched.model_confidence, Some(0.82));
        assert!(fetched.created_at <= Utc::now());
    }

    #[test]
    fn test_create_with_existing_email_conflicts_and_persists_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();

        let err = repo
            .create(new_patient("Other", "Person", "A@X.com"))
            .expect_err("duplicate email should conflict");

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_missing_required_fields_is_validation_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        let mut new = new_patient("Ann", "Lee", "a@x.com");
        new.video_file_url = None;

        let err = repo.create(new).expect_err("missing videoFileUrl");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_ids_never_reach_the_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        for bad in ["", "123", "507f1f77bcf86cd799439011", "../../etc/passwd"] {
            assert_eq!(
                repo.get_by_id(bad).unwrap_err().kind(),
                ErrorKind::InvalidIdentifier
            );
            assert_eq!(
                repo.update(bad, PatientUpdate::default()).unwrap_err().kind(),
                ErrorKind::InvalidIdentifier
            );
            assert_eq!(
                repo.delete(bad).unwrap_err().kind(),
                ErrorKind::InvalidIdentifier
            );
        }
        assert!(
            !temp_dir.path().join("patients").exists(),
            "no store directories should be touched"
        );
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        let err = repo
            .get_by_id(&PatientId::new().to_string())
            .expect_err("unknown id");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_applies_partial_fields_and_keeps_created_at() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        let created = repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();

        let updated = repo
            .update(
                &created.id.to_string(),
                PatientUpdate {
                    medications: Some(Some(vec!["Ibuprofen".into()])),
                    email: Some(Some("ANN.LEE@X.COM".into())),
                    ..PatientUpdate::default()
                },
            )
            .expect("update should succeed");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.email.as_str(), "ann.lee@x.com");
        assert_eq!(updated.medications, vec!["Ibuprofen"]);
        assert_eq!(repo.get_by_id(&created.id.to_string()).unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        let err = repo
            .update(&PatientId::new().to_string(), PatientUpdate::diagnosis("Flu"))
            .expect_err("unknown id");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_with_null_required_field_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        let created = repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();
        let id = created.id.to_string();

        for body in [
            r#"{"firstName":null}"#,
            r#"{"email":null}"#,
            r#"{"videoFileUrl":null,"notes":"kept out"}"#,
        ] {
            let update: PatientUpdate = serde_json::from_str(body).unwrap();
            let err = repo
                .update(&id, update)
                .expect_err("null required field should fail");
            assert_eq!(err.kind(), ErrorKind::Validation, "body: {body}");
        }

        assert_eq!(repo.get_by_id(&id).unwrap(), created);
    }

    #[test]
    fn test_cancelled_status_without_model_result_still_counts_as_pending() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        let created = repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();

        let updated = repo
            .update(
                &created.id.to_string(),
                PatientUpdate {
                    status: Some(DiagnosisStatus::Cancelled),
                    ..PatientUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, DiagnosisStatus::Cancelled);

        let stats = compute_stats(&repo.list().unwrap(), Utc::now().date_naive());
        assert_eq!(
            stats,
            DashboardStats {
                total: 1,
                pending: 1,
                confirmed: 0,
                today: 1,
            }
        );
    }

    #[test]
    fn test_delete_unknown_well_formed_id_succeeds() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);

        repo.delete(&PatientId::new().to_string())
            .expect("permissive delete should succeed");
    }

    #[test]
    fn test_delete_removes_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        let created = repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();
        let id = created.id.to_string();

        repo.delete(&id).unwrap();

        assert_eq!(repo.get_by_id(&id).unwrap_err().kind(), ErrorKind::NotFound);
        assert!(repo.list().unwrap().is_empty());
        // The email is free again once the record is gone.
        repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();
    }

    #[test]
    fn test_list_returns_created_patients() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = repo(&temp_dir);
        repo.create(new_patient("Ann", "Lee", "a@x.com")).unwrap();
        repo.create(new_patient("Bo", "Kim", "b@x.com")).unwrap();

        let patients = repo.list().unwrap();
        assert_eq!(patients.len(), 2);

        // Order is not guaranteed.
        assert!(patients.iter().any(|p| p.first_name.as_str() == "Ann"));
        assert!(patients.iter().any(|p| p.first_name.as_str() == "Bo"));
    }

    #[test]
    fn test_list_fails_when_root_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("patients"), "not a dir").unwrap();
        let repo = repo(&temp_dir);

        let err = repo.list().expect_err("listing a file should fail");
        assert_eq!(err.kind(), ErrorKind::Server);
    }
}
