//! Execution Offload Unit
//!
//! Runs the CPU-bound workload outside the request-handling control flow so
//! that submissions and status polls stay responsive regardless of how long
//! any single computation takes.
//!
//! ## Dispatch model
//! Every valid submission is dispatched independently, fire-and-forget:
//! a supervisor task moves the computation onto the blocking thread pool
//! (`spawn_blocking`) and, once it settles, makes exactly one
//! `complete`/`fail` call into the registry. The submitting handler retains
//! nothing but the task id. No cap is placed on in-flight tasks and no
//! ordering holds between completions of unrelated tasks.

use super::registry::TaskRegistry;
use super::types::TaskId;

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of a finished computation: the accumulated value and the
/// wall-clock time of the computation itself (queuing delay excluded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputationOutcome {
    pub result: f64,
    pub duration_ms: u64,
}

/// The engine that drives task execution.
pub struct TaskExecutor {
    /// Destination for the single terminal transition per task.
    registry: Arc<TaskRegistry>,
}

impl TaskExecutor {
    /// Creates a new TaskExecutor reporting into the given registry.
    pub fn new(registry: Arc<TaskRegistry>) -> Arc<Self> {
        Arc::new(Self { registry })
    }

    /// Schedules the computation for a freshly created task and returns
    /// immediately.
    ///
    /// The spawned supervisor owns nothing shared with the computation; its
    /// only side effect is the terminal registry call. A failure (an `Err`
    /// from the computation or a panicked/aborted blocking task) is
    /// terminal and reported as-is; there are no retries.
    pub fn dispatch(&self, id: TaskId, iterations: u64) {
        let registry = self.registry.clone();

        tokio::spawn(async move {
            tracing::debug!("Task {} starting ({} iterations)", id, iterations);

            let outcome =
                tokio::task::spawn_blocking(move || run_heavy_computation(iterations)).await;

            match outcome {
                Ok(Ok(outcome)) => {
                    registry.complete(&id, outcome.result, outcome.duration_ms);
                }
                Ok(Err(e)) => {
                    registry.fail(&id, e.to_string());
                }
                // The blocking task panicked or was cancelled at shutdown.
                Err(join_err) => {
                    registry.fail(&id, format!("computation aborted: {}", join_err));
                }
            }
        });
    }
}

/// The CPU-bound workload: `iterations` rounds of a pure numeric
/// accumulation. Deterministic for a given `iterations`; performs no I/O.
///
/// The elapsed time is measured from start to finish of the loop only, so a
/// task that sat queued behind other blocking work still reports its own
/// compute time.
pub fn run_heavy_computation(iterations: u64) -> Result<ComputationOutcome> {
    let started = Instant::now();

    let mut acc = 0.0_f64;
    for i in 0..iterations {
        let x = i as f64;
        acc += x.sqrt() * x.sin();
    }

    let duration_ms = started.elapsed().as_millis() as u64;

    if !acc.is_finite() {
        anyhow::bail!("computation produced a non-finite result");
    }

    Ok(ComputationOutcome {
        result: acc,
        duration_ms,
    })
}
