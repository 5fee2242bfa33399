use crate::view_model::{AppViewModel, JobRowView, SnapshotView};
use crate::{JobId, JobResult, RemotePoint, SessionError, Snapshot};

/// Lifecycle of the current search as seen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No search submitted yet.
    #[default]
    Idle,
    Pending,
    WaitingInput,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    /// A job exists (or is being created) and timers may be running for it.
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Pending | SessionStatus::WaitingInput)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSession {
    job_id: Option<JobId>,
    status: SessionStatus,
    results: Vec<JobResult>,
    snapshot: Option<Snapshot>,
}

impl JobSession {
    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub(crate) fn is_current(&self, job_id: &JobId) -> bool {
        self.job_id.as_ref() == Some(job_id)
    }
}

/// Validated input for a new search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
}

/// The location is required by the worker; the query may be empty.
pub fn validate_search(query: &str, location: &str) -> Result<SearchRequest, SessionError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(SessionError::InvalidQuery);
    }
    Ok(SearchRequest {
        query: query.trim().to_string(),
        location: location.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: JobSession,
    search_id: u64,
    awaiting_start: bool,
    snapshot_in_flight: bool,
    snapshot_revision: u64,
    last_click: Option<RemotePoint>,
    notice: Option<SessionError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &JobSession {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// Identifier of the most recent search submission.
    pub fn search_id(&self) -> u64 {
        self.search_id
    }

    pub fn snapshot_in_flight(&self) -> bool {
        self.snapshot_in_flight
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.session.status,
            job_id: self.session.job_id.clone(),
            results: self
                .session
                .results
                .iter()
                .map(|result| JobRowView {
                    title: result.title.clone(),
                    company: result.company.clone(),
                    location: result.location.clone(),
                    salary: result.display_salary().map(ToOwned::to_owned),
                    link: result.link.clone(),
                    source: result.source,
                })
                .collect(),
            snapshot: self.session.snapshot.as_ref().map(|snapshot| SnapshotView {
                revision: snapshot.revision(),
                byte_len: snapshot.image().len(),
                natural_size: snapshot.natural_size(),
            }),
            last_click: self.last_click,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_search(&mut self) -> u64 {
        self.search_id += 1;
        self.session = JobSession {
            status: SessionStatus::Pending,
            ..JobSession::default()
        };
        self.awaiting_start = true;
        self.snapshot_in_flight = false;
        self.last_click = None;
        self.notice = None;
        self.mark_dirty();
        self.search_id
    }

    pub(crate) fn is_awaiting_start(&self, search_id: u64) -> bool {
        self.awaiting_start && self.search_id == search_id
    }

    pub(crate) fn attach_job(&mut self, job_id: JobId) {
        self.awaiting_start = false;
        self.session.job_id = Some(job_id);
        self.mark_dirty();
    }

    pub(crate) fn abandon_start(&mut self, notice: SessionError) {
        self.awaiting_start = false;
        self.session = JobSession::default();
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn is_current_job(&self, job_id: &JobId) -> bool {
        self.session.is_current(job_id)
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        if self.session.status != status {
            self.session.status = status;
            self.mark_dirty();
        }
        if status != SessionStatus::WaitingInput && self.session.snapshot.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn complete(&mut self, results: Vec<JobResult>) {
        self.session.results = results;
        self.set_status(SessionStatus::Completed);
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: SessionError) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    /// Claims the single fetch slot; false when a fetch is already running.
    pub(crate) fn try_begin_snapshot_fetch(&mut self) -> bool {
        if self.snapshot_in_flight {
            return false;
        }
        self.snapshot_in_flight = true;
        true
    }

    pub(crate) fn finish_snapshot_fetch(&mut self) {
        self.snapshot_in_flight = false;
    }

    pub(crate) fn replace_snapshot(&mut self, image: Vec<u8>) {
        self.snapshot_revision += 1;
        // The previous capture is dropped here.
        self.session.snapshot = Some(Snapshot::new(self.snapshot_revision, image));
        self.mark_dirty();
    }

    pub(crate) fn record_click(&mut self, point: RemotePoint) {
        self.last_click = Some(point);
        self.mark_dirty();
    }
}
