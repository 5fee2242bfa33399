use std::sync::Arc;
use std::time::Duration;

use jobhunt_core::JobId;
use jobhunt_logging::{hunt_debug, hunt_info, hunt_warn};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, WorkerClient};

/// Shortest accepted poll period; tokio intervals cannot be zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls `GET /jobs/{id}` every `every` until the worker reports a terminal
/// status or `cancel` fires.
///
/// Transport failures are reported and the loop keeps going; the fixed
/// interval is the only backoff. The first request goes out one interval
/// after the call. Nothing is emitted once `cancel` has fired. A period
/// below [`MIN_POLL_INTERVAL`] is raised to it.
pub async fn poll_job(
    client: Arc<dyn WorkerClient>,
    job_id: JobId,
    every: Duration,
    cancel: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    if every < MIN_POLL_INTERVAL {
        hunt_warn!("Poll interval {:?} too short; using {:?}", every, MIN_POLL_INTERVAL);
    }
    let every = every.max(MIN_POLL_INTERVAL);
    let mut ticker = time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    hunt_debug!("Polling job {} every {:?}", job_id, every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = client.job_status(&job_id) => outcome,
        };

        match outcome {
            Ok(report) => {
                let terminal = report.status.is_terminal();
                sink.emit(EngineEvent::StatusPolled {
                    job_id: job_id.clone(),
                    report,
                });
                if terminal {
                    hunt_info!("Job {} reached a terminal status; polling stopped", job_id);
                    return;
                }
            }
            Err(error) => {
                hunt_warn!("Status poll for job {} failed: {}", job_id, error);
                sink.emit(EngineEvent::PollFailed {
                    job_id: job_id.clone(),
                    error,
                });
            }
        }
    }

    hunt_debug!("Polling for job {} cancelled", job_id);
}
