use thiserror::Error;

#[derive(Debug, Error)]
pub enum KommWertError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing input: {field}")]
    MissingInput { field: String },

    #[error("Computation domain error in {function}: {reason}")]
    ComputationDomain { function: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Inconsistent input: {field} — {reason}")]
    Consistency { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KommWertError {
    fn from(e: serde_json::Error) -> Self {
        KommWertError::SerializationError(e.to_string())
    }
}
