//! CI/CD data contracts and the decisions made on them
//!
//! Records exchanged between the CI server, builders and the web interface,
//! plus the two pieces of logic shared by all of them: deciding which
//! trusted images and credentials a pipeline gets, and collapsing step logs
//! into one status.

pub mod allow_list;
pub mod authorization;
pub mod build;
pub mod build_log;
pub mod builder_config;
pub mod builder_event;
pub mod catalog;
pub mod credentials;
pub mod errors;
pub mod manifest;
pub mod notification;
pub mod release;
pub mod repository;
pub mod status;
pub mod user;

// Re-export public types from submodules
pub use authorization::{
    CredentialsByType, add_credentials_if_not_present, resolve_credentials,
    resolve_credentials_for_trusted_image, resolve_trusted_images,
};
pub use build::{Build, GitAuthor, GitCommit, Pipeline};
pub use build_log::{BuildLog, BuildLogLine, BuildLogStep, BuildLogStepDockerImage, TailLogLine};
pub use builder_config::{
    Authorization, BuildParamsConfig, BuildVersionConfig, BuilderConfig, CiServerConfig,
    DockerNetworkConfig, GitConfig, ReleaseParamsConfig,
};
pub use builder_event::{Bot, CiBuilderEvent, CiBuilderEventWire, Job, JobType};
pub use catalog::{CatalogEntity, Label};
pub use credentials::{
    ContainerRepositoryCredentialConfig, CredentialConfig, TrustedImageConfig,
    image_path_without_tag,
};
pub use errors::{ContractError, ValidationError};
pub use manifest::{Manifest, ManifestService, ManifestStage, container_images};
pub use notification::{
    ContainerLinkDetail, Notification, NotificationLevel, NotificationLink, NotificationRecord,
    NotificationType, PipelineLinkDetail,
};
pub use release::{Release, ReleaseLog};
pub use repository::RepositoryRef;
pub use status::{
    LogStatus, LogType, Status, StepOutcome, StepRecord, aggregate_status, has_succeeded_status,
};
pub use user::{Client, Group, Organization, User, UserGroup, UserIdentity};
