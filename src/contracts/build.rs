//! Pipeline and build records

use super::catalog::Label;
use super::repository::impl_repository_ref;
use super::status::Status;
use super::user::{Group, Organization};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DurationNanoSeconds, serde_as};
use std::time::Duration;

/// A pipeline with the information of its latest build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Identifier
    pub id: String,
    /// Source host
    pub repo_source: String,
    /// Repository owner
    pub repo_owner: String,
    /// Repository name
    pub repo_name: String,
    /// Branch of the latest build
    pub repo_branch: String,
    /// Revision of the latest build
    pub repo_revision: String,
    /// Version of the latest build
    pub build_version: String,
    /// Status of the latest build
    pub build_status: Status,
    /// Labels from the manifest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Raw manifest of the latest build
    #[serde(default)]
    pub manifest: String,
    /// Groups owning the pipeline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Organizations owning the pipeline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,
    /// Moment the pipeline was first seen
    pub inserted_at: DateTime<Utc>,
    /// Moment the latest build changed
    pub updated_at: DateTime<Utc>,
}

/// A single build of a repository revision
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Identifier
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
    /// Version assigned to the build
    pub build_version: String,
    /// Status of the build
    pub build_status: Status,
    /// Labels from the manifest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Release targets the build can be released to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release_targets: Vec<String>,
    /// Raw manifest used for the build
    #[serde(default)]
    pub manifest: String,
    /// Commits included since the previous build
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<GitCommit>,
    /// Moment the build was created
    pub inserted_at: DateTime<Utc>,
    /// Moment the build started running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Moment the build last changed
    pub updated_at: DateTime<Utc>,
    /// Running time
    #[serde_as(as = "Option<DurationNanoSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Time spent waiting before starting
    #[serde_as(as = "Option<DurationNanoSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_duration: Option<Duration>,
}

/// A commit included in a build
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    /// Commit message
    pub message: String,
    /// Author of the commit
    pub author: GitAuthor,
}

/// Author of a commit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitAuthor {
    /// Author email
    pub email: String,
    /// Author display name
    pub name: String,
    /// Author user name in the source system
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

impl_repository_ref!(Pipeline, Build);
