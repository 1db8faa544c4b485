use thiserror::Error;

/// Domain-level error taxonomy.
///
/// Vendor rejections and per-line-item transport failures are folded
/// into normalized result objects instead of surfacing here; only
/// errors the caller cannot classify cross a service boundary as `Err`.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed input rejected before any network call
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Gateway answered with a non-success HTTP status
    #[error("Billing gateway error: {0}")]
    GatewayError(String),

    /// Network-level failure, including per-call timeout expiry
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Domain result alias.
pub type DomainResult<T> = Result<T, DomainError>;
