use std::fmt;

use bytes::Bytes;
use jobhunt_core::{JobId, StatusReport};
use serde::Serialize;
use thiserror::Error;

/// Everything the engine reports back to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobStarted { search_id: u64, job_id: JobId },
    JobStartFailed { search_id: u64, error: WorkerError },
    StatusPolled { job_id: JobId, report: StatusReport },
    PollFailed { job_id: JobId, error: WorkerError },
    SnapshotFetched { job_id: JobId, image: Bytes },
    SnapshotNotReady { job_id: JobId },
    ClickDispatched { job_id: JobId },
    ClickFailed { job_id: JobId, error: WorkerError },
    RefreshDue { job_id: JobId },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Body of `POST /jobs/{id}/interact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    Click { x: i64, y: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct WorkerError {
    pub kind: FailureKind,
    pub message: String,
}

impl WorkerError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not build worker client: {0}")]
    Client(#[from] WorkerError),
    #[error("could not start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
