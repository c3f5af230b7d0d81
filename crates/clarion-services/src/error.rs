//! Error types for the collaborator clients.
//!
//! Uses `thiserror` for typed errors. Degradation is not an error here:
//! rate limiting and absent configuration surface as `None`/no-op results
//! on the service methods, and only hard failures reach this type.

/// Errors raised by the reasoning, embedding, and memory clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration is present but invalid.
    #[error("config error: {0}")]
    Config(String),

    /// An operation that requires configuration was invoked on a disabled
    /// service.
    #[error("{0} service is not configured")]
    Disabled(&'static str),

    /// A collaborator returned a non-success status or was unreachable.
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
