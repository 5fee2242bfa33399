use std::sync::{mpsc, Arc};

use jobhunt_core::{Effect, Msg};
use jobhunt_engine::{
    EngineCommand, EngineError, EngineEvent, EngineHandle, EventSink, Interaction, WorkerSettings,
};
use jobhunt_logging::{hunt_debug, hunt_info};

use super::app::AppInput;

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: WorkerSettings, inbox: mpsc::Sender<AppInput>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { inbox }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelTimers => {
                    hunt_debug!("CancelTimers");
                    self.engine.send(EngineCommand::CancelTimers);
                }
                Effect::StartJob {
                    search_id,
                    query,
                    location,
                } => {
                    hunt_info!(
                        "StartJob search_id={} query_len={} location={}",
                        search_id,
                        query.len(),
                        location
                    );
                    self.engine.send(EngineCommand::StartJob {
                        search_id,
                        query,
                        location,
                    });
                }
                Effect::StartPolling { job_id } => {
                    self.engine.send(EngineCommand::StartPolling { job_id });
                }
                Effect::FetchSnapshot { job_id } => {
                    self.engine.send(EngineCommand::FetchSnapshot { job_id });
                }
                Effect::DispatchClick { job_id, point } => {
                    self.engine.send(EngineCommand::Interact {
                        job_id,
                        interaction: Interaction::Click {
                            x: point.x,
                            y: point.y,
                        },
                    });
                }
                Effect::ScheduleSnapshotRefresh { job_id } => {
                    self.engine.send(EngineCommand::ScheduleRefresh { job_id });
                }
            }
        }
    }
}

struct MsgSink {
    inbox: mpsc::Sender<AppInput>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.inbox.send(AppInput::Core(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobStarted { search_id, job_id } => Msg::JobStarted { search_id, job_id },
        EngineEvent::JobStartFailed { search_id, error } => Msg::JobStartFailed {
            search_id,
            message: error.to_string(),
        },
        EngineEvent::StatusPolled { job_id, report } => Msg::StatusPolled { job_id, report },
        EngineEvent::PollFailed { job_id, error } => Msg::PollFailed {
            job_id,
            message: error.to_string(),
        },
        EngineEvent::SnapshotFetched { job_id, image } => Msg::SnapshotFetched {
            job_id,
            image: image.to_vec(),
        },
        EngineEvent::SnapshotNotReady { job_id } => Msg::SnapshotNotReady { job_id },
        EngineEvent::ClickDispatched { job_id } => Msg::ClickDispatched { job_id },
        EngineEvent::ClickFailed { job_id, error } => Msg::ClickFailed {
            job_id,
            message: error.to_string(),
        },
        EngineEvent::RefreshDue { job_id } => Msg::RefreshDue { job_id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobhunt_core::JobId;
    use jobhunt_engine::{FailureKind, WorkerError};

    #[test]
    fn transport_errors_become_messages() {
        let msg = map_event(EngineEvent::PollFailed {
            job_id: JobId::new("abc"),
            error: WorkerError {
                kind: FailureKind::HttpStatus(502),
                message: "502 Bad Gateway".to_string(),
            },
        });
        assert_eq!(
            msg,
            Msg::PollFailed {
                job_id: JobId::new("abc"),
                message: "http status 502: 502 Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn snapshot_bytes_are_carried_over() {
        let msg = map_event(EngineEvent::SnapshotFetched {
            job_id: JobId::new("abc"),
            image: bytes_of(b"png"),
        });
        assert_eq!(
            msg,
            Msg::SnapshotFetched {
                job_id: JobId::new("abc"),
                image: b"png".to_vec(),
            }
        );
    }

    fn bytes_of(raw: &'static [u8]) -> jobhunt_engine::Bytes {
        jobhunt_engine::Bytes::from_static(raw)
    }
}
