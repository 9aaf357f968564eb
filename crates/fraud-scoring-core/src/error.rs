use thiserror::Error;

#[derive(Debug, Error)]
pub enum FraudScoringError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Transaction history unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FraudScoringError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FraudScoringError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FraudScoringError {
    fn from(e: serde_json::Error) -> Self {
        FraudScoringError::SerializationError(e.to_string())
    }
}
