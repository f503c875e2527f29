//! Client-side data gateway.
//!
//! [`PatientGateway`] wraps the REST API and keeps two pieces of local state: the dashboard list
//! and the record currently opened in detail. Every operation notifies the user of its outcome
//! and, on failure, leaves local state exactly as it was. Nothing is retried.

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::notify::{Notifier, Toast};
use api_shared::ApiResponse;
use medboard_core::{NewPatient, Patient, PatientId, PatientUpdate};
use serde::de::DeserializeOwned;

pub const FETCH_PATIENTS_FAILED: &str = "Failed to fetch patients data";
pub const FETCH_PATIENT_FAILED: &str = "Failed to load patient details";
pub const PATIENT_ADDED: &str = "Patient added successfully";
pub const ADD_PATIENT_FAILED: &str = "Failed to add patient";
pub const PATIENT_UPDATED: &str = "Patient information updated";
pub const UPDATE_PATIENT_FAILED: &str = "Failed to update patient information";
pub const DIAGNOSIS_UPDATED: &str = "Diagnosis updated successfully";
pub const UPDATE_DIAGNOSIS_FAILED: &str = "Failed to update diagnosis";
pub const PATIENT_DELETED: &str = "Patient deleted successfully";
pub const DELETE_PATIENT_FAILED: &str = "Failed to delete patient";

pub struct PatientGateway<N: Notifier> {
    http: reqwest::Client,
    config: GatewayConfig,
    notifier: N,
    patients: Vec<Patient>,
    current: Option<Patient>,
}

impl<N: Notifier> PatientGateway<N> {
    pub fn new(config: GatewayConfig, notifier: N) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            notifier,
            patients: Vec::new(),
            current: None,
        }
    }

    /// The dashboard list as last loaded and locally amended.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// The record currently open in detail, if any.
    pub fn current(&self) -> Option<&Patient> {
        self.current.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Reloads the full list. On failure the previous list is kept.
    pub async fn fetch_patients(&mut self) -> GatewayResult<&[Patient]> {
        let result = self
            .request::<Vec<Patient>>(self.http.get(self.config.patients_url()))
            .await;
        match result {
            Ok(patients) => {
                self.patients = patients;
                Ok(&self.patients)
            }
            Err(e) => Err(self.fail("fetching patients", FETCH_PATIENTS_FAILED, e)),
        }
    }

    /// Loads one record into the detail view.
    pub async fn fetch_patient(&mut self, id: &PatientId) -> GatewayResult<&Patient> {
        let result = self
            .request::<Patient>(self.http.get(self.config.patient_url(id)))
            .await;
        match result {
            Ok(patient) => Ok(self.current.insert(patient)),
            Err(e) => Err(self.fail("fetching patient details", FETCH_PATIENT_FAILED, e)),
        }
    }

    /// Creates a record and appends the server's copy to the local list without refetching.
    pub async fn create_patient(&mut self, new: &NewPatient) -> GatewayResult<Patient> {
        let result = self
            .request::<Patient>(self.http.post(self.config.patients_url()).json(new))
            .await;
        match result {
            Ok(patient) => {
                self.notifier.notify(Toast::success(PATIENT_ADDED));
                self.patients.push(patient.clone());
                Ok(patient)
            }
            Err(e) => Err(self.fail("adding patient", ADD_PATIENT_FAILED, e)),
        }
    }

    /// Sends a partial update and replaces the local copy wholesale with the server's record.
    pub async fn update_patient(
        &mut self,
        id: &PatientId,
        update: &PatientUpdate,
    ) -> GatewayResult<&Patient> {
        match self.put(id, update).await {
            Ok(patient) => {
                self.notifier.notify(Toast::success(PATIENT_UPDATED));
                Ok(self.replace_local(patient))
            }
            Err(e) => Err(self.fail("updating patient", UPDATE_PATIENT_FAILED, e)),
        }
    }

    /// Sets only the diagnosis outcome (`modelResult`).
    pub async fn update_diagnosis(
        &mut self,
        id: &PatientId,
        model_result: &str,
    ) -> GatewayResult<&Patient> {
        let update = PatientUpdate::diagnosis(model_result);
        match self.put(id, &update).await {
            Ok(patient) => {
                self.notifier.notify(Toast::success(DIAGNOSIS_UPDATED));
                Ok(self.replace_local(patient))
            }
            Err(e) => Err(self.fail("updating diagnosis", UPDATE_DIAGNOSIS_FAILED, e)),
        }
    }

    /// Deletes a record and drops it from local state.
    pub async fn delete_patient(&mut self, id: &PatientId) -> GatewayResult<()> {
        match self.delete(id).await {
            Ok(()) => {
                self.notifier.notify(Toast::success(PATIENT_DELETED));
                self.patients.retain(|p| p.id != *id);
                if self.current.as_ref().is_some_and(|p| p.id == *id) {
                    self.current = None;
                }
                Ok(())
            }
            Err(e) => Err(self.fail("deleting patient", DELETE_PATIENT_FAILED, e)),
        }
    }

    async fn put(&self, id: &PatientId, update: &PatientUpdate) -> GatewayResult<Patient> {
        self.request(self.http.put(self.config.patient_url(id)).json(update))
            .await
    }

    async fn delete(&self, id: &PatientId) -> GatewayResult<()> {
        let response = self
            .http
            .delete(self.config.patient_url(id))
            .send()
            .await?;
        let status = response.status().as_u16();
        let envelope: ApiResponse<serde::de::IgnoredAny> =
            response.json().await.map_err(|e| GatewayError::Decode {
                status,
                detail: e.to_string(),
            })?;
        if envelope.success {
            Ok(())
        } else {
            Err(GatewayError::Rejected {
                status,
                message: envelope.message.unwrap_or_default(),
            })
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> GatewayResult<T> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| GatewayError::Decode {
            status,
            detail: e.to_string(),
        })?;
        envelope
            .into_data()
            .map_err(|message| GatewayError::Rejected { status, message })
    }

    fn replace_local(&mut self, patient: Patient) -> &Patient {
        if let Some(entry) = self.patients.iter_mut().find(|p| p.id == patient.id) {
            *entry = patient.clone();
        }
        self.current.insert(patient)
    }

    fn fail(&self, action: &str, description: &str, err: GatewayError) -> GatewayError {
        tracing::error!("Error {}: {}", action, err);
        self.notifier.notify(Toast::error(description));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{ToastChannel, ToastVariant};
    use api_rest::AppState;
    use medboard_core::{CoreConfig, PatientRepository};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Harness {
        _dir: TempDir,
        gateway: PatientGateway<ToastChannel>,
        toasts: UnboundedReceiver<Toast>,
    }

    async fn start() -> Harness {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf()).expect("valid config");
        let state = AppState::new(PatientRepository::new(Arc::new(cfg)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(api_rest::serve(listener, state));

        let config = GatewayConfig::new(&format!("http://{addr}")).unwrap();
        let (channel, toasts) = ToastChannel::open();
        Harness {
            _dir: temp_dir,
            gateway: PatientGateway::new(config, channel),
            toasts,
        }
    }

    fn new_patient(first: &str, email: &str, model_result: Option<&str>) -> NewPatient {
        NewPatient {
            first_name: Some(first.into()),
            last_name: Some("Tester".into()),
            email: Some(email.into()),
            model_result: model_result.map(str::to_string),
            audio_file_url: Some("https://media.example/a.mp3".into()),
            video_file_url: Some("https://media.example/v.mp4".into()),
            ..NewPatient::default()
        }
    }

    fn next_toast(rx: &mut UnboundedReceiver<Toast>) -> Toast {
        rx.try_recv().expect("expected a toast")
    }

    #[tokio::test]
    async fn test_create_appends_without_refetch() {
        let mut h = start().await;
        h.gateway.fetch_patients().await.unwrap();
        assert!(h.gateway.patients().is_empty());

        let created = h
            .gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();

        assert_eq!(h.gateway.patients(), &[created]);
        let toast = next_toast(&mut h.toasts);
        assert_eq!(toast, Toast::success(PATIENT_ADDED));
    }

    #[tokio::test]
    async fn test_duplicate_create_notifies_error_and_keeps_list() {
        let mut h = start().await;
        h.gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();
        next_toast(&mut h.toasts);

        let err = h
            .gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Rejected { status: 500, .. }));
        assert_eq!(h.gateway.patients().len(), 1);
        let toast = next_toast(&mut h.toasts);
        assert_eq!(toast.title, "Error");
        assert_eq!(toast.description, ADD_PATIENT_FAILED);
        assert_eq!(toast.variant, ToastVariant::Destructive);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let mut h = start().await;
        h.gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();
        h.gateway.fetch_patients().await.unwrap();
        next_toast(&mut h.toasts);

        // Nothing listens on port 9 of loopback in the test environment.
        h.gateway.config = GatewayConfig::new("http://127.0.0.1:9").unwrap();
        let err = h.gateway.fetch_patients().await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(h.gateway.patients().len(), 1);
        assert_eq!(next_toast(&mut h.toasts), Toast::error(FETCH_PATIENTS_FAILED));
    }

    #[tokio::test]
    async fn test_update_replaces_current_wholesale() {
        let mut h = start().await;
        let created = h
            .gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();
        h.gateway.fetch_patient(&created.id).await.unwrap();

        let update = PatientUpdate {
            notes: Some(Some("follow up in two weeks".into())),
            ..PatientUpdate::default()
        };
        h.gateway.update_patient(&created.id, &update).await.unwrap();

        let current = h.gateway.current().unwrap();
        assert_eq!(current.notes.as_deref(), Some("follow up in two weeks"));
        assert_eq!(current.created_at, created.created_at);
        assert_eq!(h.gateway.patients()[0], *current);
    }

    #[tokio::test]
    async fn test_update_diagnosis_sets_model_result_only() {
        let mut h = start().await;
        let created = h
            .gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();
        next_toast(&mut h.toasts);

        let updated = h
            .gateway
            .update_diagnosis(&created.id, "Influenza")
            .await
            .unwrap()
            .clone();

        assert_eq!(updated.model_result.as_deref(), Some("Influenza"));
        assert_eq!(updated.status, created.status);
        assert_eq!(next_toast(&mut h.toasts), Toast::success(DIAGNOSIS_UPDATED));
    }

    #[tokio::test]
    async fn test_fetch_unknown_patient_notifies_and_keeps_current() {
        let mut h = start().await;
        let missing = PatientId::new();

        let err = h.gateway.fetch_patient(&missing).await.unwrap_err();

        match err {
            GatewayError::Rejected { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Patient not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(h.gateway.current().is_none());
        assert_eq!(next_toast(&mut h.toasts), Toast::error(FETCH_PATIENT_FAILED));
    }

    #[tokio::test]
    async fn test_delete_removes_from_local_state() {
        let mut h = start().await;
        let ann = h
            .gateway
            .create_patient(&new_patient("Ann", "ann@example.com", None))
            .await
            .unwrap();
        h.gateway
            .create_patient(&new_patient("Bo", "bo@example.com", Some("Flu")))
            .await
            .unwrap();
        h.gateway.fetch_patient(&ann.id).await.unwrap();

        h.gateway.delete_patient(&ann.id).await.unwrap();

        assert_eq!(h.gateway.patients().len(), 1);
        assert_eq!(h.gateway.patients()[0].first_name.as_str(), "Bo");
        assert!(h.gateway.current().is_none());

        h.gateway.fetch_patients().await.unwrap();
        assert_eq!(h.gateway.patients().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_still_succeeds() {
        let mut h = start().await;
        h.gateway.delete_patient(&PatientId::new()).await.unwrap();
        assert_eq!(next_toast(&mut h.toasts), Toast::success(PATIENT_DELETED));
    }
}
