use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("invalid seed data: {0}")]
    Seed(String),
    #[error("failed to read seed file: {0}")]
    FileRead(std::io::Error),
    #[error("patient store lock poisoned")]
    LockPoisoned,
}

impl PatientError {
    /// True when the error came from rejecting caller input rather than from the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PatientError::InvalidInput(_) | PatientError::Validation(_)
        )
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
