//! Jobhunt core: pure session state machine, click geometry and saved-items reconciliation.
mod effect;
mod error;
mod geometry;
mod job;
mod msg;
mod saved;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::SessionError;
pub use geometry::{map_click, ClickEvent, RemotePoint};
pub use job::{JobId, JobResult, JobSource, StatusReport, WorkerStatus};
pub use msg::Msg;
pub use saved::{
    Clock, MemoryStore, NewSavedItem, OwnerId, SaveOutcome, SavedItem, SavedItemId,
    SavedItemStore, SavedItems, SavedItemsError, StoreError,
};
pub use snapshot::Snapshot;
pub use state::{validate_search, AppState, JobSession, SearchRequest, SessionStatus};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView, SnapshotView};
