//! Release and release log records

use super::build_log::BuildLogStep;
use super::repository::impl_repository_ref;
use super::status::{self, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, DurationNanoSeconds, serde_as};
use std::time::Duration;

/// A release of a pipeline version to a release target
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Release target name
    pub name: String,
    /// Action within the release target
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Source host
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_source: String,
    /// Repository owner
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_owner: String,
    /// Repository name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_name: String,
    /// Version being released
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_version: String,
    /// Status of the release
    #[serde(default)]
    pub release_status: Status,
    /// Who triggered the release
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub triggered_by: String,
    /// Moment the release was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
    /// Moment the release started running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Moment the release last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Running time
    #[serde_as(as = "Option<DurationNanoSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Time spent waiting before starting
    #[serde_as(as = "Option<DurationNanoSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_duration: Option<Duration>,
}

impl_repository_ref!(Release);

/// The log of one release
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseLog {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Source host
    pub repo_source: String,
    /// Repository owner
    pub repo_owner: String,
    /// Repository name
    pub repo_name: String,
    /// Release the log belongs to
    #[serde(rename = "releaseID", default)]
    pub release_id: String,
    /// Step logs in execution order
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub steps: Vec<BuildLogStep>,
    /// Moment the log was stored
    pub inserted_at: DateTime<Utc>,
}

impl ReleaseLog {
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

impl_repository_ref!(ReleaseLog);
