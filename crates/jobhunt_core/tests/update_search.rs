use std::sync::Once;

use jobhunt_core::{update, AppState, Effect, JobId, Msg, SessionError, SessionStatus};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobhunt_logging::initialize_for_tests);
}

fn submit(state: AppState, query: &str, location: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SearchSubmitted {
            query: query.to_string(),
            location: location.to_string(),
        },
    )
}

#[test]
fn empty_location_is_rejected_without_remote_call() {
    init_logging();
    for location in ["", "   "] {
        let (mut state, effects) = submit(AppState::new(), "backend engineer", location);

        assert!(effects.is_empty());
        assert_eq!(state.status(), SessionStatus::Idle);
        assert_eq!(state.view().notice, Some(SessionError::InvalidQuery));
        assert!(state.consume_dirty());
    }
}

#[test]
fn search_enters_pending_and_starts_job() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "  backend engineer ", " Madrid ");

    assert_eq!(state.status(), SessionStatus::Pending);
    assert_eq!(state.session().job_id(), None);
    assert_eq!(
        effects,
        vec![Effect::StartJob {
            search_id: 1,
            query: "backend engineer".to_string(),
            location: "Madrid".to_string(),
        }]
    );
}

#[test]
fn query_is_optional() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "", "Madrid");
    assert_eq!(state.status(), SessionStatus::Pending);
    assert_eq!(effects.len(), 1);
}

#[test]
fn job_started_begins_polling() {
    init_logging();
    let (state, _) = submit(AppState::new(), "", "Madrid");
    let (state, effects) = update(
        state,
        Msg::JobStarted {
            search_id: 1,
            job_id: JobId::new("abc"),
        },
    );

    assert_eq!(state.session().job_id(), Some(&JobId::new("abc")));
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: JobId::new("abc")
        }]
    );
}

#[test]
fn new_search_cancels_previous_timers_before_reset() {
    init_logging();
    let (state, _) = submit(AppState::new(), "", "Madrid");
    let (state, _) = update(
        state,
        Msg::JobStarted {
            search_id: 1,
            job_id: JobId::new("old"),
        },
    );

    let (state, effects) = submit(state, "rust", "Barcelona");

    assert_eq!(
        effects,
        vec![
            Effect::CancelTimers,
            Effect::StartJob {
                search_id: 2,
                query: "rust".to_string(),
                location: "Barcelona".to_string(),
            },
        ]
    );
    assert_eq!(state.session().job_id(), None);
    assert!(state.session().results().is_empty());
    assert_eq!(state.status(), SessionStatus::Pending);
}

#[test]
fn stale_job_start_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new(), "", "Madrid");
    let (state, _) = submit(state, "", "Sevilla");

    let (state, effects) = update(
        state,
        Msg::JobStarted {
            search_id: 1,
            job_id: JobId::new("stale"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session().job_id(), None);

    let (state, effects) = update(
        state,
        Msg::JobStarted {
            search_id: 2,
            job_id: JobId::new("fresh"),
        },
    );
    assert_eq!(state.session().job_id(), Some(&JobId::new("fresh")));
    assert_eq!(effects.len(), 1);
}

#[test]
fn failed_start_returns_to_idle_with_notice() {
    init_logging();
    let (state, _) = submit(AppState::new(), "", "Madrid");
    let (state, effects) = update(
        state,
        Msg::JobStartFailed {
            search_id: 1,
            message: "connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::Idle);
    assert_eq!(
        state.view().notice,
        Some(SessionError::TransportFailure("connection refused".to_string()))
    );
}

#[test]
fn rejected_search_keeps_running_session() {
    init_logging();
    let (state, _) = submit(AppState::new(), "", "Madrid");
    let (state, _) = update(
        state,
        Msg::JobStarted {
            search_id: 1,
            job_id: JobId::new("abc"),
        },
    );

    let (state, effects) = submit(state, "rust", "");
    assert!(effects.is_empty());
    assert_eq!(state.session().job_id(), Some(&JobId::new("abc")));
    assert_eq!(state.status(), SessionStatus::Pending);
}
