//! Pipeline execution: runs, retries, and cancellation.

mod cancellation;
mod executor;
mod retry;


pub use cancellation::CancellationToken;
pub use executor::{ExecutorConfig, PipelineExecutor};
pub use retry::{Backoff, RetryPolicy};

use crate::profile::CompanyProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The lifecycle state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Accepted, not yet started.
    Pending,
    /// Stages are executing.
    Running,
    /// Every stage produced output.
    Completed,
    /// A stage failed after exhausting its retries.
    Failed,
    /// Cancelled between stages.
    Cancelled,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The content produced for one stage during one run.
///
/// Never mutated after creation; either fully present or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// The stage that produced this output.
    pub stage_id: String,
    /// The stage's section title.
    pub title: String,
    /// Generated section content.
    pub content: String,
    /// How many generation attempts the stage took.
    pub attempts: u32,
    /// Wall-clock duration of the stage in milliseconds.
    pub duration_ms: f64,
}

/// Why and where a run failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    /// The stage whose generation exhausted its retries.
    pub stage_id: String,
    /// The final generation error message.
    pub message: String,
    /// Attempts made before giving up.
    pub attempts: u32,
}

/// One execution of all stages for one profile.
///
/// Owns its profile and outputs exclusively; nothing is shared across runs
/// except the immutable stage graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// The profile this run generated from.
    pub profile: CompanyProfile,
    /// Outputs in static topological order. On failure or cancellation,
    /// holds everything produced before the halt.
    pub outputs: Vec<StageOutput>,
    /// Current lifecycle state.
    pub status: RunStatus,
    /// Failure record, set when `status` is `Failed`.
    pub error: Option<RunFailure>,
    /// When execution began.
    pub started_at: DateTime<Utc>,
    /// When the run reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    /// Creates a pending run for a profile.
    #[must_use]
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            outputs: Vec::new(),
            status: RunStatus::Pending,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Looks up a stage's output by id.
    #[must_use]
    pub fn output(&self, stage_id: &str) -> Option<&StageOutput> {
        self.outputs.iter().find(|o| o.stage_id == stage_id)
    }

    /// Returns how many stages completed.
    #[must_use]
    pub fn completed_stages(&self) -> usize {
        self.outputs.len()
    }

    /// Returns whether the run completed every stage.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}
