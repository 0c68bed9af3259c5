#[derive(thiserror::Error, Debug)]
pub enum RlweKexError {
    /// Error when creating a ring with an invalid modulus (q <= 1).
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    /// Ring dimension, noise or reconciliation parameters rejected at construction.
    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    /// Transported polynomial could not be decoded back into the ring.
    #[error("DecodingError: {0}")]
    DecodingError(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
