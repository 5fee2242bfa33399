#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use jobhunt_engine::{EngineEvent, EventSink};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobhunt_logging::initialize_for_tests);
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Waits until `done` holds for the recorded events or `limit` elapses.
    pub async fn wait_for(
        &self,
        limit: Duration,
        done: impl Fn(&[EngineEvent]) -> bool,
    ) -> Vec<EngineEvent> {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let events = self.snapshot();
            if done(&events) || tokio::time::Instant::now() >= deadline {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn status_body(status: &str) -> serde_json::Value {
    serde_json::json!({ "id": "abc", "status": status, "results": [] })
}
