mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{init_logging, status_body, TestSink};
use jobhunt_core::JobId;
use jobhunt_engine::{EngineCommand, EngineEvent, EngineHandle, Interaction, WorkerSettings};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> WorkerSettings {
    WorkerSettings {
        base_url: server.uri(),
        poll_interval: Duration::from_millis(20),
        refresh_delay: Duration::from_millis(40),
        ..WorkerSettings::default()
    }
}

fn job() -> JobId {
    JobId::new("abc")
}

#[tokio::test]
async fn start_job_reports_job_id() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"job_id": "abc"})))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let engine = EngineHandle::new(settings_for(&server), Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::StartJob {
        search_id: 3,
        query: String::new(),
        location: "Madrid".to_string(),
    });

    let events = sink
        .wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;
    assert_eq!(
        events,
        vec![EngineEvent::JobStarted {
            search_id: 3,
            job_id: job()
        }]
    );
}

#[tokio::test]
async fn unreachable_worker_reports_start_failure() {
    init_logging();
    let settings = WorkerSettings {
        // Reserved port, nothing listens there.
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..WorkerSettings::default()
    };
    let sink = TestSink::new();
    let engine = EngineHandle::new(settings, Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::StartJob {
        search_id: 1,
        query: String::new(),
        location: "Madrid".to_string(),
    });

    let events = sink
        .wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::JobStartFailed { search_id: 1, .. }]
    ));
}

#[tokio::test]
async fn click_then_refresh_fires_once() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/abc/interact"))
        .and(body_json(serde_json::json!({"action": "click", "x": 5, "y": 6})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let engine = EngineHandle::new(settings_for(&server), Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::Interact {
        job_id: job(),
        interaction: Interaction::Click { x: 5, y: 6 },
    });
    sink.wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;
    engine.send(EngineCommand::ScheduleRefresh { job_id: job() });

    let events = sink
        .wait_for(Duration::from_secs(5), |events| events.len() >= 2)
        .await;
    assert_eq!(
        events,
        vec![
            EngineEvent::ClickDispatched { job_id: job() },
            EngineEvent::RefreshDue { job_id: job() },
        ]
    );
}

#[tokio::test]
async fn failed_click_is_reported() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/abc/interact"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let engine = EngineHandle::new(settings_for(&server), Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::Interact {
        job_id: job(),
        interaction: Interaction::Click { x: 1, y: 1 },
    });

    let events = sink
        .wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;
    assert!(matches!(events.as_slice(), [EngineEvent::ClickFailed { .. }]));
}

#[tokio::test]
async fn cancel_timers_stops_poll_and_pending_refresh() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("pending")))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let engine = EngineHandle::new(settings_for(&server), Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::StartPolling { job_id: job() });
    sink.wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;

    engine.send(EngineCommand::ScheduleRefresh { job_id: job() });
    engine.send(EngineCommand::CancelTimers);
    engine.send(EngineCommand::CancelTimers);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let settled = sink.snapshot();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let later = sink.snapshot();

    assert_eq!(settled.len(), later.len());
    assert!(!later
        .iter()
        .any(|event| matches!(event, EngineEvent::RefreshDue { .. })));
}

#[tokio::test]
async fn snapshot_fetch_maps_missing_frame_to_not_ready() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/abc/screenshot"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let engine = EngineHandle::new(settings_for(&server), Arc::new(sink.clone())).unwrap();
    engine.send(EngineCommand::FetchSnapshot { job_id: job() });

    let events = sink
        .wait_for(Duration::from_secs(5), |events| !events.is_empty())
        .await;
    assert_eq!(events, vec![EngineEvent::SnapshotNotReady { job_id: job() }]);
}
