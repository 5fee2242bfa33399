use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use jobhunt_core::JobId;
use jobhunt_logging::{hunt_debug, hunt_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ReqwestWorkerClient, WorkerClient, WorkerSettings};
use crate::poller::poll_job;
use crate::{EngineError, EngineEvent, EventSink, Interaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    StartJob {
        search_id: u64,
        query: String,
        location: String,
    },
    StartPolling { job_id: JobId },
    /// Cancels the poll loop and any pending refresh. Safe to repeat.
    CancelTimers,
    FetchSnapshot { job_id: JobId },
    Interact { job_id: JobId, interaction: Interaction },
    ScheduleRefresh { job_id: JobId },
}

/// Runs worker requests and timers on a background tokio runtime.
///
/// Dropping the handle stops the runtime and every timer with it.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: WorkerSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestWorkerClient::new(&settings)?);
        Self::with_client(client, settings, sink)
    }

    pub fn with_client(
        client: Arc<dyn WorkerClient>,
        settings: WorkerSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let timing = Timing {
                poll_interval: settings.poll_interval,
                refresh_delay: settings.refresh_delay,
            };
            let mut timers = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::CancelTimers => {
                        timers.cancel();
                        timers = CancellationToken::new();
                    }
                    command => {
                        let client = client.clone();
                        let sink = sink.clone();
                        let token = timers.child_token();
                        runtime.spawn(async move {
                            handle_command(client, command, timing, token, sink).await;
                        });
                    }
                }
            }
            timers.cancel();
            hunt_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            hunt_warn!("Engine is no longer running; command dropped");
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    poll_interval: Duration,
    refresh_delay: Duration,
}

async fn handle_command(
    client: Arc<dyn WorkerClient>,
    command: EngineCommand,
    timing: Timing,
    timers: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    match command {
        EngineCommand::StartJob {
            search_id,
            query,
            location,
        } => {
            let event = match client.start_job(&query, &location).await {
                Ok(job_id) => EngineEvent::JobStarted { search_id, job_id },
                Err(error) => {
                    hunt_warn!("Starting search {} failed: {}", search_id, error);
                    EngineEvent::JobStartFailed { search_id, error }
                }
            };
            sink.emit(event);
        }
        EngineCommand::StartPolling { job_id } => {
            poll_job(client, job_id, timing.poll_interval, timers, sink).await;
        }
        EngineCommand::FetchSnapshot { job_id } => {
            let event = match client.screenshot(&job_id).await {
                Ok(Some(image)) => EngineEvent::SnapshotFetched { job_id, image },
                Ok(None) => EngineEvent::SnapshotNotReady { job_id },
                Err(error) => {
                    hunt_warn!("Screenshot for job {} failed: {}", job_id, error);
                    EngineEvent::SnapshotNotReady { job_id }
                }
            };
            sink.emit(event);
        }
        EngineCommand::Interact {
            job_id,
            interaction,
        } => {
            let event = match client.interact(&job_id, interaction).await {
                Ok(()) => EngineEvent::ClickDispatched { job_id },
                Err(error) => {
                    hunt_warn!("Interaction for job {} failed: {}", job_id, error);
                    EngineEvent::ClickFailed { job_id, error }
                }
            };
            sink.emit(event);
        }
        EngineCommand::ScheduleRefresh { job_id } => {
            tokio::select! {
                _ = timers.cancelled() => {
                    hunt_debug!("Refresh for job {} cancelled", job_id);
                }
                _ = tokio::time::sleep(timing.refresh_delay) => {
                    sink.emit(EngineEvent::RefreshDue { job_id });
                }
            }
        }
        // Handled on the command thread before dispatch.
        EngineCommand::CancelTimers => {}
    }
}
