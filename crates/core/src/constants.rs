//! Constants used throughout the MedBoard core crate.
//!
//! Path and filename constants live here so the store and its tests agree on layout.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Directory name for patient documents under the data directory.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// Filename for a patient document.
pub const PATIENT_JSON_FILENAME: &str = "patient.json";

/// Scratch filename used while a patient document is being replaced.
pub const PATIENT_JSON_TMP_FILENAME: &str = "patient.json.tmp";
