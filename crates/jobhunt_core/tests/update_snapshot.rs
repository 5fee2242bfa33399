use std::sync::Once;

use jobhunt_core::{
    update, AppState, ClickEvent, Effect, JobId, Msg, RemotePoint, SessionError, SessionStatus,
    StatusReport, WorkerStatus,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobhunt_logging::initialize_for_tests);
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

fn job() -> JobId {
    JobId::new("abc")
}

fn polled(status: WorkerStatus) -> Msg {
    Msg::StatusPolled {
        job_id: job(),
        report: StatusReport::new(status),
    }
}

fn waiting_session() -> (AppState, Vec<Effect>) {
    let (state, _) = update(
        AppState::new(),
        Msg::SearchSubmitted {
            query: "backend engineer".to_string(),
            location: "Madrid".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::JobStarted {
            search_id: 1,
            job_id: job(),
        },
    );
    update(state, polled(WorkerStatus::WaitingInput))
}

fn with_snapshot() -> AppState {
    let (state, _) = waiting_session();
    let (state, _) = update(
        state,
        Msg::SnapshotFetched {
            job_id: job(),
            image: png(800, 600),
        },
    );
    state
}

#[test]
fn waiting_input_requests_a_snapshot() {
    init_logging();
    let (state, effects) = waiting_session();
    assert_eq!(state.status(), SessionStatus::WaitingInput);
    assert_eq!(effects, vec![Effect::FetchSnapshot { job_id: job() }]);
    assert!(state.snapshot_in_flight());
}

#[test]
fn overlapping_fetches_are_coalesced() {
    init_logging();
    let (state, _) = waiting_session();
    let (state, effects) = update(state, polled(WorkerStatus::WaitingInput));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::SnapshotRequested);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::SnapshotNotReady { job_id: job() });
    assert!(!state.snapshot_in_flight());
    assert_eq!(state.session().snapshot(), None);

    let (_, effects) = update(state, polled(WorkerStatus::WaitingInput));
    assert_eq!(effects, vec![Effect::FetchSnapshot { job_id: job() }]);
}

#[test]
fn fetched_snapshot_replaces_previous_one() {
    init_logging();
    let state = with_snapshot();
    let first = state.view().snapshot.unwrap();
    assert_eq!(first.natural_size, Some((800, 600)));

    let (state, effects) = update(state, Msg::SnapshotRequested);
    assert_eq!(effects, vec![Effect::FetchSnapshot { job_id: job() }]);
    let (state, _) = update(
        state,
        Msg::SnapshotFetched {
            job_id: job(),
            image: png(1024, 768),
        },
    );

    let second = state.view().snapshot.unwrap();
    assert!(second.revision > first.revision);
    assert_eq!(second.natural_size, Some((1024, 768)));
}

#[test]
fn late_snapshot_after_completion_is_discarded() {
    init_logging();
    let (state, _) = waiting_session();
    let (state, _) = update(state, polled(WorkerStatus::Completed));
    let (state, effects) = update(
        state,
        Msg::SnapshotFetched {
            job_id: job(),
            image: png(800, 600),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::Completed);
    assert_eq!(state.session().snapshot(), None);
}

#[test]
fn leaving_waiting_input_clears_snapshot() {
    init_logging();
    let state = with_snapshot();
    assert!(state.session().snapshot().is_some());

    let (state, _) = update(state, polled(WorkerStatus::Running));
    assert_eq!(state.status(), SessionStatus::Pending);
    assert_eq!(state.session().snapshot(), None);
}

#[test]
fn click_is_scaled_and_dispatched() {
    init_logging();
    let state = with_snapshot();
    let click = ClickEvent::on_image(100.0, 50.0, (400.0, 300.0), (800.0, 600.0));

    let (state, effects) = update(state, Msg::ImageClicked(click));
    let point = RemotePoint { x: 200, y: 100 };
    assert_eq!(
        effects,
        vec![Effect::DispatchClick {
            job_id: job(),
            point
        }]
    );
    assert_eq!(state.view().last_click, Some(point));

    let (state, effects) = update(state, Msg::ClickDispatched { job_id: job() });
    assert_eq!(
        effects,
        vec![Effect::ScheduleSnapshotRefresh { job_id: job() }]
    );

    let (_, effects) = update(state, Msg::RefreshDue { job_id: job() });
    assert_eq!(effects, vec![Effect::FetchSnapshot { job_id: job() }]);
}

#[test]
fn click_without_geometry_is_skipped() {
    init_logging();
    let state = with_snapshot();
    let click = ClickEvent::on_image(10.0, 10.0, (0.0, 300.0), (800.0, 600.0));

    let (state, effects) = update(state, Msg::ImageClicked(click));
    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::WaitingInput);
    assert_eq!(state.view().notice, Some(SessionError::GeometryUnavailable));
}

#[test]
fn click_without_job_is_noop() {
    init_logging();
    let click = ClickEvent::on_image(10.0, 10.0, (400.0, 300.0), (800.0, 600.0));
    let (state, effects) = update(AppState::new(), Msg::ImageClicked(click));
    assert!(effects.is_empty());
    assert_eq!(state, AppState::new());
}

#[test]
fn click_failure_is_transient() {
    init_logging();
    let state = with_snapshot();
    let (state, effects) = update(
        state,
        Msg::ClickFailed {
            job_id: job(),
            message: "http status 500".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::WaitingInput);
    assert!(matches!(
        state.view().notice,
        Some(SessionError::TransportFailure(_))
    ));
}

#[test]
fn refresh_for_stale_job_is_ignored() {
    init_logging();
    let state = with_snapshot();
    let (_, effects) = update(
        state,
        Msg::RefreshDue {
            job_id: JobId::new("other"),
        },
    );
    assert!(effects.is_empty());
}
