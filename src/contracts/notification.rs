//! Notifications attached to pipelines or containers
//!
//! A notification record is linked either to a pipeline or to a container
//! image. The link and its details form one tagged value, so a record can
//! never carry container details while claiming to be about a pipeline.

use super::user::{Group, Organization};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Not set
    #[default]
    #[serde(rename = "")]
    Unknown,
    /// Vulnerability found by a scanner
    Vulnerability,
    /// General warning
    Warning,
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Not set
    #[default]
    #[serde(rename = "")]
    Unknown,
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

/// A single message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Kind of notification
    #[serde(rename = "type", default)]
    pub notification_type: NotificationType,
    /// Severity
    #[serde(default)]
    pub level: NotificationLevel,
    /// Message text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Details of a notification about a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineLinkDetail {
    /// Branch the notification applies to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    /// Revision the notification applies to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revision: String,
    /// Build version the notification applies to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Status of that build
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Details of a notification about a container image
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLinkDetail {
    /// Image tag the notification applies to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Pipelines building the image
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pipelines: Vec<String>,
}

/// What a notification record is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "linkType", content = "linkDetail", rename_all = "lowercase")]
pub enum NotificationLink {
    /// A pipeline, identified by its full repository path
    Pipeline(PipelineLinkDetail),
    /// A container image, identified by its path
    Container(ContainerLinkDetail),
}

impl NotificationLink {
    /// Pipeline details, if the record is about a pipeline
    #[must_use]
    pub fn pipeline_detail(&self) -> Option<&PipelineLinkDetail> {
        match self {
            Self::Pipeline(detail) => Some(detail),
            Self::Container(_) => None,
        }
    }

    /// Container details, if the record is about a container image
    #[must_use]
    pub fn container_detail(&self) -> Option<&ContainerLinkDetail> {
        match self {
            Self::Container(detail) => Some(detail),
            Self::Pipeline(_) => None,
        }
    }

    /// Wire name of the link type
    #[must_use]
    pub fn link_type(&self) -> &'static str {
        match self {
            Self::Pipeline(_) => "pipeline",
            Self::Container(_) => "container",
        }
    }
}

/// Notifications produced by one source for one linked entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Linked entity and its details
    #[serde(flatten)]
    pub link: NotificationLink,
    /// Pipeline path or image path of the linked entity
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_entity: String,
    /// Producer of the notifications, e.g. a scanner name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
    /// Moment the record was stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
    /// Groups owning the linked entity
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Organizations owning the linked entity
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,
}

impl NotificationRecord {
    /// Highest level among the notifications
    #[must_use]
    pub fn highest_level(&self) -> NotificationLevel {
        self.notifications
            .iter()
            .map(|n| n.level)
            .max()
            .unwrap_or_default()
    }
}
