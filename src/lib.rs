//! # pipeline-contracts - shared contracts for a CI/CD platform
//!
//! Records exchanged between the CI server, its builder jobs and the web
//! interface, together with two pieces of logic every one of those services
//! needs to agree on.
//!
//! ## Features
//!
//! - **Authorization resolution**: which trusted images a pipeline may use and
//!   which stored credentials get injected into them, driven by allow-lists
//!   matched against the full repository path and the trusted image path
//! - **Status aggregation**: one overall status for a build or release from
//!   its step logs, honouring retries and cancellation
//! - **Records**: pipelines, builds, releases, logs, builder events, users,
//!   notifications and catalog entities with their JSON/YAML wire names
//!
//! ## Quick Start
//!
//! ```
//! use pipeline_contracts::prelude::*;
//!
//! let credentials = vec![
//!     CredentialConfig::new("gke-a", "kubernetes-engine")
//!         .allow_pipelines("github.com/org/.+"),
//! ];
//! let trusted_images = vec![
//!     TrustedImageConfig::new("extensions/gke").inject("kubernetes-engine"),
//! ];
//!
//! let pipeline = "github.com/org/service";
//! let images = resolve_trusted_images(&trusted_images, &["extensions/gke:stable"], pipeline);
//! let injected = resolve_credentials(&credentials, images.iter().copied(), pipeline);
//!
//! assert_eq!(injected.len(), 1);
//! assert_eq!(injected[0].name, "gke-a");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod contracts;
pub mod infrastructure;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use contracts::{
    Authorization, BuildLog, BuilderConfig, CiBuilderEvent, ContractError, CredentialConfig,
    CredentialsByType, Job, LogStatus, Manifest, ManifestStage, ReleaseLog, Status,
    TrustedImageConfig, ValidationError, aggregate_status, has_succeeded_status,
    resolve_credentials, resolve_credentials_for_trusted_image, resolve_trusted_images,
};
pub use infrastructure::{Config, OutputFormat, init_logging};

/// Version of the pipeline-contracts crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
