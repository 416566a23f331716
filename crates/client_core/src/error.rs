use thiserror::Error;

/// Failure reported by a [`crate::directory::UserDirectory`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The request never produced a usable page (network fault, timeout,
    /// unexpected status, undecodable body).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The endpoint answered with a human-readable explanation.
    #[error("{0}")]
    Diagnostic(String),
}
