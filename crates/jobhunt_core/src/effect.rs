use crate::{JobId, RemotePoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the poll loop and any pending delayed refresh. Idempotent.
    CancelTimers,
    StartJob {
        search_id: u64,
        query: String,
        location: String,
    },
    StartPolling { job_id: JobId },
    FetchSnapshot { job_id: JobId },
    DispatchClick { job_id: JobId, point: RemotePoint },
    ScheduleSnapshotRefresh { job_id: JobId },
}
