use medboard_uuid::{PatientId, UuidError};

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("a patient with email '{0}' already exists")]
    Conflict(String),
    #[error("invalid patient id: {0}")]
    InvalidIdentifier(#[from] UuidError),
    #[error("patient not found: {0}")]
    NotFound(PatientId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create patient directory: {0}")]
    PatientDirCreation(std::io::Error),
    #[error("failed to list patient directory: {0}")]
    DirRead(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove patient directory: {0}")]
    DirRemove(std::io::Error),
    #[error("failed to serialize patient: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient: {0}")]
    Deserialization(serde_json::Error),
    #[error("patient store lock poisoned")]
    LockPoisoned,
}

/// Coarse classification of [`PatientError`] used at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    InvalidIdentifier,
    NotFound,
    Server,
}

impl PatientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PatientError::Validation(_) => ErrorKind::Validation,
            PatientError::Conflict(_) => ErrorKind::Conflict,
            PatientError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            PatientError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Server,
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
