//! Prelude module for common imports

// Authorization
pub use crate::contracts::authorization::{
    CredentialsByType, resolve_credentials, resolve_credentials_for_trusted_image,
    resolve_trusted_images,
};
pub use crate::contracts::builder_config::{Authorization, BuilderConfig, GitConfig};
pub use crate::contracts::credentials::{CredentialConfig, TrustedImageConfig};
pub use crate::contracts::manifest::{Manifest, ManifestService, ManifestStage};

// Status aggregation
pub use crate::contracts::status::{
    LogStatus, Status, StepOutcome, StepRecord, aggregate_status, has_succeeded_status,
};

// Records
pub use crate::contracts::build::{Build, Pipeline};
pub use crate::contracts::build_log::{BuildLog, BuildLogStep};
pub use crate::contracts::builder_event::{CiBuilderEvent, Job, JobType};
pub use crate::contracts::errors::{ContractError, ValidationError};
pub use crate::contracts::release::{Release, ReleaseLog};
pub use crate::contracts::repository::RepositoryRef;
