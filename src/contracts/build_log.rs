//! Build log records
//!
//! A build log holds one entry per executed step, including retries of the
//! same stage, and is what the aggregated status of a build is computed from.

use super::repository::impl_repository_ref;
use super::status::{self, LogStatus, LogType, Status, StepOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, DurationNanoSeconds, serde_as};
use std::time::Duration;

/// The log of one build of a revision
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLog {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Source host
    pub repo_source: String,
    /// Repository owner
    pub repo_owner: String,
    /// Repository name
    pub repo_name: String,
    /// Branch
    pub repo_branch: String,
    /// Revision
    pub repo_revision: String,
    /// Build the log belongs to
    #[serde(rename = "buildID", default)]
    pub build_id: String,
    /// Step logs in execution order
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub steps: Vec<BuildLogStep>,
    /// Moment the log was stored
    pub inserted_at: DateTime<Utc>,
}

impl BuildLog {
    /// Aggregated status across all steps
    #[must_use]
    pub fn aggregated_status(&self) -> Status {
        status::aggregate_status(&self.steps)
    }

    /// Returns true if the aggregated status is succeeded
    #[must_use]
    pub fn has_succeeded_status(&self) -> bool {
        status::has_succeeded_status(&self.steps)
    }
}

impl_repository_ref!(BuildLog);

/// The log of a single step of a pipeline
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogStep {
    /// Stage name
    pub step: String,
    /// Nesting depth, 0 for top level stages
    #[serde(default, skip_serializing_if = "is_zero")]
    pub depth: u32,
    /// Image the step ran in
    #[serde(default)]
    pub image: Option<BuildLogStepDockerImage>,
    /// Attempt number, 0 for the first run
    #[serde(default, skip_serializing_if = "is_zero")]
    pub run_index: u32,
    /// Running time
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    #[serde(default)]
    pub duration: Duration,
    /// Output lines
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub log_lines: Vec<BuildLogLine>,
    /// Exit code of the container
    #[serde(default)]
    pub exit_code: i64,
    /// Outcome of the step
    #[serde(default)]
    pub status: LogStatus,
    /// Step was added by the builder rather than the manifest
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_injected: bool,
    /// Parallel stages run as part of this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_steps: Vec<BuildLogStep>,
    /// Service containers run alongside this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<BuildLogStep>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl StepOutcome for BuildLogStep {
    fn stage_name(&self) -> &str {
        &self.step
    }

    fn retry_index(&self) -> u32 {
        self.run_index
    }

    fn status(&self) -> LogStatus {
        self.status
    }
}

/// Information about the image a step ran in
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogStepDockerImage {
    /// Image name
    pub name: String,
    /// Image tag
    pub tag: String,
    /// Image was pulled for this step
    #[serde(default)]
    pub is_pulled: bool,
    /// Image size in bytes
    #[serde(default)]
    pub image_size: i64,
    /// Time spent pulling
    #[serde_as(as = "DurationNanoSeconds<u64>")]
    #[serde(default)]
    pub pull_duration: Duration,
    /// Pull error, if any
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Image is a trusted image
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_trusted: bool,
}

/// A single line of output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogLine {
    /// Line number within the step
    #[serde(rename = "line", default, skip_serializing_if = "is_zero")]
    pub line_number: u32,
    /// Moment the line was written
    pub timestamp: DateTime<Utc>,
    /// `stdout` or `stderr`
    pub stream_type: String,
    /// Line content
    pub text: String,
}

/// A log update streamed to the web interface while a build runs
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailLogLine {
    /// Stage name
    pub step: String,
    /// Stage a parallel stage or service belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stage: Option<String>,
    /// Whether the line comes from a stage or a service
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Nesting depth
    #[serde(default, skip_serializing_if = "is_zero")]
    pub depth: u32,
    /// Attempt number
    #[serde(default, skip_serializing_if = "is_zero")]
    pub run_index: u32,
    /// New output line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_line: Option<BuildLogLine>,
    /// Image information, sent once pulled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BuildLogStepDockerImage>,
    /// Running time, sent when the step finishes
    #[serde_as(as = "Option<DurationNanoSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Exit code, sent when the step finishes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    /// Status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LogStatus>,
    /// Step was added by the builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_injected: Option<bool>,
}
