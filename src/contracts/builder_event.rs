//! Events sent by a builder job back to the CI server
//!
//! On the wire the job payload is a loose set of optional fields next to a
//! `jobType` discriminator. In memory it is a [`Job`] with exactly one
//! payload, and conversion from the wire form fails when the payload the
//! job type asks for is absent.

use super::build::Build;
use super::builder_config::GitConfig;
use super::errors::ValidationError;
use super::release::Release;
use super::repository::impl_repository_ref;
use super::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of job run by a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Build of a revision
    Build,
    /// Release of a version
    Release,
    /// Bot reacting to repository events
    Bot,
}

impl JobType {
    /// Wire value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Release => "release",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobType {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "build" => Ok(Self::Build),
            "release" => Ok(Self::Release),
            "bot" => Ok(Self::Bot),
            other => Err(ValidationError::UnknownJobType(other.to_string())),
        }
    }
}

/// A bot run triggered by a repository event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Bot name from the manifest
    pub name: String,
    /// Source host
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_source: String,
    /// Repository owner
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_owner: String,
    /// Repository name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo_name: String,
    /// Status of the bot run
    #[serde(default)]
    pub bot_status: Status,
    /// Moment the bot run was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
}

impl_repository_ref!(Bot);

/// Payload of a builder job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Build payload
    Build(Build),
    /// Release payload
    Release(Release),
    /// Bot payload
    Bot(Bot),
}

impl Job {
    /// Job type matching the payload
    #[must_use]
    pub fn job_type(&self) -> JobType {
        match self {
            Self::Build(_) => JobType::Build,
            Self::Release(_) => JobType::Release,
            Self::Bot(_) => JobType::Bot,
        }
    }
}

/// Event a builder job posts to the CI server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CiBuilderEventWire", into = "CiBuilderEventWire")]
pub struct CiBuilderEvent {
    /// Kubernetes job name
    pub job_name: String,
    /// Pod the job ran in
    pub pod_name: String,
    /// Repository the job ran for
    pub git: GitConfig,
    /// Job payload
    pub job: Job,
}

impl CiBuilderEvent {
    /// Job type of the payload
    #[must_use]
    pub fn job_type(&self) -> JobType {
        self.job.job_type()
    }
}

/// Wire representation of [`CiBuilderEvent`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CiBuilderEventWire {
    /// Job type discriminator
    #[serde(rename = "jobType", default, skip_serializing_if = "String::is_empty")]
    pub job_type: String,
    /// Kubernetes job name
    #[serde(default)]
    pub job_name: String,
    /// Pod the job ran in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_name: String,
    /// Build payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    /// Release payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
    /// Bot payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<Bot>,
    /// Repository the job ran for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitConfig>,
}

impl TryFrom<CiBuilderEventWire> for CiBuilderEvent {
    type Error = ValidationError;

    fn try_from(wire: CiBuilderEventWire) -> Result<Self, Self::Error> {
        let git = wire.git.ok_or(ValidationError::MissingGit)?;
        let job_type = JobType::try_from(wire.job_type.as_str())?;

        let job = match job_type {
            JobType::Build => wire.build.map(Job::Build),
            JobType::Release => wire.release.map(Job::Release),
            JobType::Bot => wire.bot.map(Job::Bot),
        }
        .ok_or_else(|| ValidationError::MissingJobPayload {
            job_type: job_type.to_string(),
        })?;

        Ok(Self {
            job_name: wire.job_name,
            pod_name: wire.pod_name,
            git,
            job,
        })
    }
}

impl From<CiBuilderEvent> for CiBuilderEventWire {
    fn from(event: CiBuilderEvent) -> Self {
        let mut wire = Self {
            job_type: event.job_type().to_string(),
            job_name: event.job_name,
            pod_name: event.pod_name,
            git: Some(event.git),
            ..Default::default()
        };
        match event.job {
            Job::Build(build) => wire.build = Some(build),
            Job::Release(release) => wire.release = Some(release),
            Job::Bot(bot) => wire.bot = Some(bot),
        }
        wire
    }
}
