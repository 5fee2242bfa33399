use crate::{JobId, JobSource, RemotePoint, SessionError, SessionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: SessionStatus,
    pub job_id: Option<JobId>,
    pub results: Vec<JobRowView>,
    pub snapshot: Option<SnapshotView>,
    pub last_click: Option<RemotePoint>,
    /// Transient problem worth showing; never a session failure.
    pub notice: Option<SessionError>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub link: String,
    pub source: JobSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotView {
    pub revision: u64,
    pub byte_len: usize,
    pub natural_size: Option<(u32, u32)>,
}
