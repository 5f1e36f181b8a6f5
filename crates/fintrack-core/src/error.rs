use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient balance: requested {requested:.2}, available {available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },
    #[error("No transaction at position {index} (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

impl CoreError {
    /// Returns `true` for failures caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_)
                | CoreError::InsufficientBalance { .. }
                | CoreError::IndexOutOfRange { .. }
        )
    }
}
