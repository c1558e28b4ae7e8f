use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaydownError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PaydownError {
    fn from(e: serde_json::Error) -> Self {
        PaydownError::SerializationError(e.to_string())
    }
}
