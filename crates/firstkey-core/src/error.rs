use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirstKeyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for FirstKeyError {
    fn from(e: serde_json::Error) -> Self {
        FirstKeyError::SerializationError(e.to_string())
    }
}

impl FirstKeyError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        FirstKeyError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
