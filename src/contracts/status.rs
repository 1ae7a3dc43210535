//! Execution statuses and status aggregation
//!
//! Builds and releases carry a [`Status`]; the individual steps recorded in
//! their logs carry a [`LogStatus`]. [`aggregate_status`] collapses the step
//! records of one run into the status of the whole run.

#![allow(clippy::must_use_candidate)]

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a build or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Containers are being pulled
    Pending,
    /// Execution is in progress
    Running,
    /// Execution was successful
    Succeeded,
    /// Execution was not successful
    Failed,
    /// Cancellation was requested
    Canceling,
    /// Execution was canceled
    Canceled,
    /// No status known; serialized as the empty string
    #[default]
    Unknown,
}

impl Status {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceling => "canceling",
            Self::Canceled => "canceled",
            Self::Unknown => "",
        }
    }

    /// Returns true once no further state change is expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceling" => Self::Canceling,
            "canceled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single step in a build or release log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogStatus {
    /// Execution never started for some reason
    #[default]
    Unknown,
    /// Container is being pulled
    Pending,
    /// Container is running
    Running,
    /// Execution was successful
    Succeeded,
    /// Execution was not successful
    Failed,
    /// Execution was skipped
    Skipped,
    /// Execution was canceled
    Canceled,
}

impl LogStatus {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl From<&str> for LogStatus {
    fn from(value: &str) -> Self {
        match value {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "SKIPPED" => Self::Skipped,
            "CANCELED" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for LogStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<LogStatus> for String {
    fn from(status: LogStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of container a streamed log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    /// Main stage or parallel stage
    Stage,
    /// Service container
    Service,
}

/// Anything that reports the outcome of one attempt at a stage
pub trait StepOutcome {
    /// Name of the stage; retries share it
    fn stage_name(&self) -> &str;

    /// Attempt number, 0 for the first run
    fn retry_index(&self) -> u32;

    /// Status of this attempt
    fn status(&self) -> LogStatus;
}

/// One execution record for a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Stage name
    pub stage_name: String,
    /// Attempt number
    #[serde(default)]
    pub retry_index: u32,
    /// Status of the attempt
    #[serde(default)]
    pub status: LogStatus,
}

impl StepRecord {
    /// Creates a record for the first attempt at a stage
    pub fn new(stage_name: impl Into<String>, status: LogStatus) -> Self {
        Self {
            stage_name: stage_name.into(),
            retry_index: 0,
            status,
        }
    }

    /// Sets the attempt number
    #[must_use]
    pub fn with_retry(mut self, retry_index: u32) -> Self {
        self.retry_index = retry_index;
        self
    }
}

impl StepOutcome for StepRecord {
    fn stage_name(&self) -> &str {
        &self.stage_name
    }

    fn retry_index(&self) -> u32 {
        self.retry_index
    }

    fn status(&self) -> LogStatus {
        self.status
    }
}

/// Aggregates step records into the status of the whole run.
///
/// Records are taken in input order and the last one seen for a stage wins,
/// so callers that want retries to count must pass them chronologically.
/// Any canceled record makes the run canceled; otherwise a stage whose latest
/// record failed makes it failed, a stage left in an unrecognized state makes
/// it unknown, and everything else (including pending, running and skipped)
/// counts as succeeded. An empty slice yields [`Status::Unknown`].
pub fn aggregate_status<S: StepOutcome>(steps: &[S]) -> Status {
    if steps.is_empty() {
        return Status::Unknown;
    }

    let mut positions: AHashMap<&str, usize> = AHashMap::with_capacity(steps.len());
    let mut latest: Vec<(&str, LogStatus)> = Vec::with_capacity(steps.len());

    for step in steps {
        let status = step.status();
        if status == LogStatus::Canceled {
            tracing::debug!(stage = %step.stage_name(), "Canceled step, run is canceled");
            return Status::Canceled;
        }

        match positions.get(step.stage_name()) {
            Some(&position) => latest[position].1 = status,
            None => {
                positions.insert(step.stage_name(), latest.len());
                latest.push((step.stage_name(), status));
            }
        }
    }

    if latest.iter().any(|(_, status)| *status == LogStatus::Failed) {
        return Status::Failed;
    }
    if latest.iter().any(|(_, status)| *status == LogStatus::Unknown) {
        return Status::Unknown;
    }

    Status::Succeeded
}

/// Returns true if the aggregated status of the steps is succeeded
pub fn has_succeeded_status<S: StepOutcome>(steps: &[S]) -> bool {
    aggregate_status(steps) == Status::Succeeded
}
