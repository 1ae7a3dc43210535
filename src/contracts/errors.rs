//! Error types for the contracts domain

use thiserror::Error;

/// Errors raised while loading or converting contract documents
#[derive(Error, Debug)]
pub enum ContractError {
    /// Validation failed with specified reason
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// YAML document could not be parsed
    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON document could not be parsed
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Document format could not be derived from the file name
    #[error("Unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ContractError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Validation errors for records received at a service boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Git configuration is required for every builder event
    #[error("git needs to be set")]
    MissingGit,

    /// Job type is absent or not one of build, release or bot
    #[error("unknown job type: '{0}'")]
    UnknownJobType(String),

    /// The payload matching the job type is absent
    #[error("{job_type} needs to be set for jobType {job_type}")]
    MissingJobPayload {
        /// Job type whose payload is missing.
        job_type: String,
    },
}
