use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the `iterations` input of a heavy task.
pub const MAX_ITERATIONS: u64 = 1_000_000;

/// Unique identifier for a submitted task.
///
/// Wrapper around a UUID v4. Rendered in canonical text form at the HTTP
/// boundary; identifiers are never reused for the lifetime of the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generates a new random UUID v4-based TaskId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a task id from its canonical text form.
    ///
    /// Returns `None` for anything that is not a well-formed UUID, so
    /// malformed path parameters fall through to the not-found path.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents the lifecycle state of a task.
///
/// A task starts as `Processing` and transitions exactly once to one of the
/// two terminal states. The terminal payload lives on the variant itself;
/// the flat `result`/`duration`/`errorMessage` wire shape is produced only
/// when rendering a status response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskStatus {
    /// Submitted and dispatched; the computation has not finished yet.
    Processing,
    /// Finished successfully.
    Completed {
        /// Numeric outcome of the computation.
        result: f64,
        /// Wall-clock time of the computation itself, in milliseconds.
        duration_ms: u64,
    },
    /// Execution hit a fault (non-finite result, panic, aborted worker).
    Error { message: String },
}

impl TaskStatus {
    /// True once the task has reached `Completed` or `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Processing)
    }

    /// The status label used on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Processing => "processing",
            TaskStatus::Completed { .. } => "completed",
            TaskStatus::Error { .. } => "error",
        }
    }
}

/// One submitted unit of offloaded computation, as stored in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    /// Input parameter, immutable after creation.
    pub iterations: u64,
    /// Timestamp (ms) when the task was submitted.
    pub submitted_at: u64,
    pub status: TaskStatus,
}

impl TaskRecord {
    /// Constructs a fresh `Processing` record, enforcing the `iterations`
    /// bound of `[1, MAX_ITERATIONS]`.
    pub fn new(id: TaskId, iterations: u64) -> anyhow::Result<Self> {
        if iterations == 0 || iterations > MAX_ITERATIONS {
            anyhow::bail!(
                "iterations must be between 1 and {}, got {}",
                MAX_ITERATIONS,
                iterations
            );
        }

        Ok(Self {
            id,
            iterations,
            submitted_at: now_ms(),
            status: TaskStatus::Processing,
        })
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
