use crate::{ClickEvent, JobId, StatusReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted the search form.
    SearchSubmitted { query: String, location: String },
    /// Worker accepted the job created for `search_id`.
    JobStarted { search_id: u64, job_id: JobId },
    /// `POST /jobs/start` did not produce a job.
    JobStartFailed { search_id: u64, message: String },
    /// A poll tick returned the worker's status.
    StatusPolled { job_id: JobId, report: StatusReport },
    /// A poll tick could not reach the worker.
    PollFailed { job_id: JobId, message: String },
    /// User asked for a fresh view of the remote browser.
    SnapshotRequested,
    /// The delayed refresh scheduled after a click fired.
    RefreshDue { job_id: JobId },
    SnapshotFetched { job_id: JobId, image: Vec<u8> },
    /// The worker had no frame to show (non-success response).
    SnapshotNotReady { job_id: JobId },
    /// User clicked the rendered snapshot.
    ImageClicked(ClickEvent),
    ClickDispatched { job_id: JobId },
    ClickFailed { job_id: JobId, message: String },
    /// Host is tearing the session down.
    SessionClosed,
    /// Render tick.
    Tick,
}
