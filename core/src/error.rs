use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Stable, machine-readable tag for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::InvalidArgument { .. } => "invalid_argument",
            SimError::Persistence(_) => "persistence",
            SimError::InvalidData(_) => "invalid_data",
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
