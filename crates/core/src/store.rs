//! File-backed patient document store.
//!
//! Each patient is one JSON document in a sharded directory tree:
//!
//! ```text
//! patients/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         patient.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the identifier.
//!
//! Writes go through a single store-wide lock. That makes the email uniqueness check and the
//! write that follows it one atomic step, which is the only cross-document guarantee the store
//! offers. Reads take no lock; a document is replaced by writing a scratch file and renaming it
//! over the original, so readers never observe a half-written document.

use crate::config::CoreConfig;
use crate::constants::{PATIENT_JSON_FILENAME, PATIENT_JSON_TMP_FILENAME};
use crate::error::{PatientError, PatientResult};
use crate::model::Patient;
use medboard_uuid::PatientId;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct PatientStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl PatientStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            root: cfg.patients_dir(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads every patient document.
    ///
    /// Order follows directory traversal and is not sorted. A missing root directory yields an
    /// empty list. Documents that cannot be read or parsed are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::DirRead`] if the root directory exists but cannot be listed.
    pub fn list(&self) -> PatientResult<Vec<Patient>> {
        let mut patients = Vec::new();

        let s1_iter = match fs::read_dir(&self.root) {
            Ok(it) => it,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(patients),
            Err(e) => return Err(PatientError::DirRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let Ok(s2_iter) = fs::read_dir(&s1_path) else {
                continue;
            };
            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let Ok(id_iter) = fs::read_dir(&s2_path) else {
                    continue;
                };
                for id_ent in id_iter.flatten() {
                    let patient_path = id_ent.path().join(PATIENT_JSON_FILENAME);
                    if !patient_path.is_file() {
                        continue;
                    }

                    match read_document(&patient_path) {
                        Ok(patient) => patients.push(patient),
                        Err(e) => {
                            tracing::warn!(
                                "skipping unreadable patient document {}: {}",
                                patient_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(patients)
    }

    /// Loads a single document, or `None` if no document exists for `id`.
    pub fn load(&self, id: &PatientId) -> PatientResult<Option<Patient>> {
        let path = self.document_path(id);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(PatientError::Deserialization),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(PatientError::FileRead(e)),
        }
    }

    /// Persists a brand new document.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Conflict`] if another document already uses the same email.
    pub fn insert(&self, patient: &Patient) -> PatientResult<()> {
        let _guard = self.lock()?;
        self.ensure_email_available(patient)?;

        let dir = patient.id.sharded_dir(&self.root);
        fs::create_dir_all(&dir).map_err(PatientError::PatientDirCreation)?;
        write_document(&dir, patient)
    }

    /// Loads, mutates and rewrites a document as one step under the write lock.
    ///
    /// Returns `Ok(None)` if no document exists for `id`. If `mutate` fails nothing is written.
    ///
    /// # Errors
    ///
    /// Propagates errors from `mutate`; returns [`PatientError::Conflict`] if the mutated
    /// document's email collides with a different document.
    pub fn modify<F>(&self, id: &PatientId, mutate: F) -> PatientResult<Option<Patient>>
    where
        F: FnOnce(&mut Patient) -> PatientResult<()>,
    {
        let _guard = self.lock()?;

        let Some(mut patient) = self.load(id)? else {
            return Ok(None);
        };
        mutate(&mut patient)?;
        self.ensure_email_available(&patient)?;

        write_document(&patient.id.sharded_dir(&self.root), &patient)?;
        Ok(Some(patient))
    }

    /// Removes the document for `id`. Removing an absent document is not an error.
    pub fn remove(&self, id: &PatientId) -> PatientResult<()> {
        let _guard = self.lock()?;

        match fs::remove_dir_all(id.sharded_dir(&self.root)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(PatientError::DirRemove(e)),
        }
    }

    fn document_path(&self, id: &PatientId) -> PathBuf {
        id.sharded_dir(&self.root).join(PATIENT_JSON_FILENAME)
    }

    fn lock(&self) -> PatientResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| PatientError::LockPoisoned)
    }

    // Caller must hold the write lock.
    fn ensure_email_available(&self, patient: &Patient) -> PatientResult<()> {
        let taken = self
            .list()?
            .iter()
            .any(|other| other.id != patient.id && other.email == patient.email);
        if taken {
            return Err(PatientError::Conflict(patient.email.to_string()));
        }
        Ok(())
    }
}

fn read_document(path: &Path) -> PatientResult<Patient> {
    let contents = fs::read_to_string(path).map_err(PatientError::FileRead)?;
    serde_json::from_str(&contents).map_err(PatientError::Deserialization)
}

fn write_document(dir: &Path, patient: &Patient) -> PatientResult<()> {
    let json = serde_json::to_string_pretty(patient).map_err(PatientError::Serialization)?;
    let tmp = dir.join(PATIENT_JSON_TMP_FILENAME);
    fs::write(&tmp, json).map_err(PatientError::FileWrite)?;
    fs::rename(&tmp, dir.join(PATIENT_JSON_FILENAME)).map_err(PatientError::FileWrite)
}
