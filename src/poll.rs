use std::fmt;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use serde::Deserialize;

/// Status document returned by the service while a task runs.
#[derive(Debug, Deserialize)]
pub struct TaskStatus {
    pub progress: u8,
    pub status: String,
}

const STATUS_COMPLETE: &str = "complete";

/// Source of task status probes. The HTTP client implements this; tests
/// drive the poll loop with scripted response sequences instead.
pub trait StatusClient {
    fn task_status(&self, task_id: &str) -> Result<TaskStatus>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Task reached 100% progress with status "complete".
    Completed,
    /// Task reached 100% progress in an error state. Terminal, never retried.
    Failed,
    /// Attempt budget ran out before the task resolved either way.
    Exhausted,
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PollOutcome::Completed => write!(f, "completed"),
            PollOutcome::Failed => write!(f, "failed"),
            PollOutcome::Exhausted => write!(f, "retries exhausted"),
        }
    }
}

/// Poll the task status until it resolves or the attempt budget runs out.
///
/// Progress reaching 100 is the only terminal signal. Everything else, which
/// includes transport errors, non-200 responses and unparseable status
/// bodies, is retried uniformly: log, consume one attempt, sleep `interval`,
/// probe again. The backend drops sporadic errors under load and a dedicated
/// error-classification scheme buys nothing here.
pub fn wait_for_completion(
    client: &impl StatusClient,
    task_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> PollOutcome {
    for attempt in 1..=max_attempts {
        match client.task_status(task_id) {
            Ok(status) if status.progress == 100 => {
                if status.status == STATUS_COMPLETE {
                    info!("task {task_id} complete after {attempt} attempt(s)");
                    return PollOutcome::Completed;
                }
                // The service has declared an error state; any status other
                // than "complete" at full progress is terminal.
                warn!("task {task_id} ended with status: {}", status.status);
                return PollOutcome::Failed;
            }
            Ok(status) => {
                info!(
                    "task {task_id} at {}% (attempt {attempt}/{max_attempts})",
                    status.progress
                );
            }
            Err(err) => {
                warn!("status check failed (attempt {attempt}/{max_attempts}): {err:#}");
            }
        }
        thread::sleep(interval);
    }
    PollOutcome::Exhausted
}
