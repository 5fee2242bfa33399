use thiserror::Error;

/// Failures the session reports to its host. None of these end a session;
/// only the worker reporting `failed` does that.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a search needs a location")]
    InvalidQuery,
    #[error("the snapshot has no usable size yet")]
    GeometryUnavailable,
    #[error("worker unreachable: {0}")]
    TransportFailure(String),
}
