//! Jobhunt engine: worker HTTP client, poll loop and effect execution.
mod client;
mod engine;
mod persist;
mod poller;
mod types;

pub use bytes::Bytes;
pub use client::{ReqwestWorkerClient, WorkerClient, WorkerSettings};
pub use engine::{EngineCommand, EngineHandle};
pub use persist::{DataDir, PersistError, SAVED_ITEMS_FILE, SNAPSHOT_FILE};
pub use poller::{poll_job, MIN_POLL_INTERVAL};
pub use types::{
    EngineError, EngineEvent, EventSink, FailureKind, Interaction, WorkerError,
};
