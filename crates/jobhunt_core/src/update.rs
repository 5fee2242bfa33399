use jobhunt_logging::{hunt_debug, hunt_info, hunt_warn};

use crate::{
    map_click, validate_search, AppState, Effect, JobId, Msg, SessionError, SessionStatus,
    StatusReport, WorkerStatus,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every asynchronous source feeds this one function, so there is no other
/// place where the session can be mutated.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted { query, location } => {
            let request = match validate_search(&query, &location) {
                Ok(request) => request,
                Err(err) => {
                    hunt_warn!("Search rejected: {}", err);
                    state.set_notice(err);
                    return (state, Vec::new());
                }
            };

            let mut effects = Vec::with_capacity(2);
            // Stale ticks from the previous job must not outlive the reset.
            if state.status().is_active() {
                effects.push(Effect::CancelTimers);
            }
            let search_id = state.begin_search();
            hunt_info!(
                "Search {} submitted query={:?} location={:?}",
                search_id,
                request.query,
                request.location
            );
            effects.push(Effect::StartJob {
                search_id,
                query: request.query,
                location: request.location,
            });
            effects
        }
        Msg::JobStarted { search_id, job_id } => {
            if !state.is_awaiting_start(search_id) {
                hunt_debug!("Ignoring job {} for stale search {}", job_id, search_id);
                return (state, Vec::new());
            }
            hunt_info!("Search {} running as job {}", search_id, job_id);
            state.attach_job(job_id.clone());
            vec![Effect::StartPolling { job_id }]
        }
        Msg::JobStartFailed { search_id, message } => {
            if state.is_awaiting_start(search_id) {
                hunt_warn!("Search {} could not start: {}", search_id, message);
                state.abandon_start(SessionError::TransportFailure(message));
            }
            Vec::new()
        }
        Msg::StatusPolled { job_id, report } => apply_status(&mut state, job_id, report),
        Msg::PollFailed { job_id, message } => {
            if state.is_current_job(&job_id) && state.status().is_active() {
                hunt_warn!("Poll for job {} failed: {}", job_id, message);
                state.set_notice(SessionError::TransportFailure(message));
            }
            Vec::new()
        }
        Msg::SnapshotRequested => match state.session().job_id().cloned() {
            Some(job_id) => request_snapshot(&mut state, job_id),
            None => Vec::new(),
        },
        Msg::RefreshDue { job_id } => {
            if state.is_current_job(&job_id) {
                request_snapshot(&mut state, job_id)
            } else {
                Vec::new()
            }
        }
        Msg::SnapshotFetched { job_id, image } => {
            if !state.is_current_job(&job_id) {
                hunt_debug!("Dropping snapshot for stale job {}", job_id);
                return (state, Vec::new());
            }
            state.finish_snapshot_fetch();
            if state.status() == SessionStatus::WaitingInput {
                state.replace_snapshot(image);
            } else {
                hunt_debug!(
                    "Dropping snapshot for job {} in status {:?}",
                    job_id,
                    state.status()
                );
            }
            Vec::new()
        }
        Msg::SnapshotNotReady { job_id } => {
            if state.is_current_job(&job_id) {
                hunt_debug!("No frame yet for job {}", job_id);
                state.finish_snapshot_fetch();
            }
            Vec::new()
        }
        Msg::ImageClicked(click) => {
            let Some(job_id) = state.session().job_id().cloned() else {
                return (state, Vec::new());
            };
            if state.status() != SessionStatus::WaitingInput {
                hunt_debug!("Ignoring click while {:?}", state.status());
                return (state, Vec::new());
            }
            match map_click(&click) {
                Ok(point) => {
                    hunt_info!(
                        "Click displayed=({}, {}) -> remote=({}, {})",
                        click.client_x - click.origin_x,
                        click.client_y - click.origin_y,
                        point.x,
                        point.y
                    );
                    state.record_click(point);
                    vec![Effect::DispatchClick { job_id, point }]
                }
                Err(err) => {
                    hunt_warn!("Click skipped: {}", err);
                    state.set_notice(err);
                    Vec::new()
                }
            }
        }
        Msg::ClickDispatched { job_id } => {
            if state.is_current_job(&job_id) && state.status() == SessionStatus::WaitingInput {
                vec![Effect::ScheduleSnapshotRefresh { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::ClickFailed { job_id, message } => {
            if state.is_current_job(&job_id) {
                hunt_warn!("Click for job {} failed: {}", job_id, message);
                state.set_notice(SessionError::TransportFailure(message));
            }
            Vec::new()
        }
        Msg::SessionClosed => {
            if state.status().is_active() {
                vec![Effect::CancelTimers]
            } else {
                Vec::new()
            }
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, job_id: JobId, report: StatusReport) -> Vec<Effect> {
    if !state.is_current_job(&job_id) {
        hunt_debug!("Dropping status for stale job {}", job_id);
        return Vec::new();
    }
    if state.status().is_terminal() {
        hunt_debug!("Dropping status for finished job {}", job_id);
        return Vec::new();
    }

    state.clear_notice();
    match report.status {
        WorkerStatus::Pending | WorkerStatus::Running | WorkerStatus::Unknown => {
            state.set_status(SessionStatus::Pending);
            Vec::new()
        }
        WorkerStatus::WaitingInput => {
            if state.status() != SessionStatus::WaitingInput {
                hunt_info!("Job {} is waiting for input", job_id);
            }
            state.set_status(SessionStatus::WaitingInput);
            request_snapshot(state, job_id)
        }
        WorkerStatus::Completed => {
            hunt_info!(
                "Job {} completed with {} results",
                job_id,
                report.results.len()
            );
            state.finish_snapshot_fetch();
            state.complete(report.results);
            vec![Effect::CancelTimers]
        }
        WorkerStatus::Failed => {
            hunt_warn!("Job {} failed on the worker", job_id);
            state.finish_snapshot_fetch();
            state.set_status(SessionStatus::Failed);
            vec![Effect::CancelTimers]
        }
    }
}

fn request_snapshot(state: &mut AppState, job_id: JobId) -> Vec<Effect> {
    if state.status() != SessionStatus::WaitingInput {
        return Vec::new();
    }
    if !state.try_begin_snapshot_fetch() {
        hunt_debug!("Snapshot fetch already running for job {}", job_id);
        return Vec::new();
    }
    vec![Effect::FetchSnapshot { job_id }]
}
