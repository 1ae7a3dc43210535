//! Credential and trusted image catalog entries
//!
//! Credentials are stored centrally for every kind of authenticated service
//! (container registries, kubernetes clusters, source control APIs, chat
//! webhooks). Trusted images are the only containers that may receive them,
//! and both sides can narrow their use with allow-list patterns.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::allow_list;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, typed bundle of secret properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    /// Name, unique within a catalog
    pub name: String,

    /// Credential type, e.g. `container-registry` or `kubernetes-engine`
    #[serde(rename = "type")]
    pub credential_type: String,

    /// Pattern the full repository path of a pipeline must match
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "whitelistedPipelines"
    )]
    pub allowed_pipelines: Option<String>,

    /// Pattern the path of a trusted image must match
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "whitelistedTrustedImages"
    )]
    pub allowed_trusted_images: Option<String>,

    /// Type specific properties, kept inline in the document
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl CredentialConfig {
    /// Creates a credential without allow-lists or properties
    pub fn new(name: impl Into<String>, credential_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential_type: credential_type.into(),
            allowed_pipelines: None,
            allowed_trusted_images: None,
            properties: BTreeMap::new(),
        }
    }

    /// Restricts the credential to pipelines matching `pattern`
    pub fn allow_pipelines(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pipelines = Some(pattern.into());
        self
    }

    /// Restricts the credential to trusted images matching `pattern`
    pub fn allow_trusted_images(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_trusted_images = Some(pattern.into());
        self
    }

    /// Adds a type specific property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a string property
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }

    /// The `(name, type)` pair identifying this credential
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.credential_type)
    }

    /// Returns true if the pipeline allow-list admits `full_repository_path`
    pub fn allows_pipeline(&self, full_repository_path: &str) -> bool {
        allow_list::is_allowed(self.allowed_pipelines.as_deref(), full_repository_path)
    }

    /// Returns true if the trusted image allow-list admits `trusted_image`
    pub fn allows_trusted_image(&self, trusted_image: &TrustedImageConfig) -> bool {
        allow_list::is_allowed(
            self.allowed_trusted_images.as_deref(),
            &trusted_image.image_path,
        )
    }
}

/// A container image allowed elevated capabilities or injected credentials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedImageConfig {
    /// Image path without tag
    #[serde(rename = "path", alias = "imagePath")]
    pub image_path: String,

    /// Run the container in privileged mode
    #[serde(default)]
    pub run_privileged: bool,

    /// Mount the docker socket and binary
    #[serde(default)]
    pub run_docker: bool,

    /// Allow arbitrary commands to be run in the container
    #[serde(default)]
    pub allow_commands: bool,

    /// Credential types injected into the container, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injected_credential_types: Vec<String>,

    /// Pattern the full repository path of a pipeline must match
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "whitelistedPipelines"
    )]
    pub allowed_pipelines: Option<String>,
}

impl TrustedImageConfig {
    /// Creates a trusted image without capabilities
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            ..Default::default()
        }
    }

    /// Adds a credential type to inject
    pub fn inject(mut self, credential_type: impl Into<String>) -> Self {
        self.injected_credential_types.push(credential_type.into());
        self
    }

    /// Sets privileged mode
    pub fn run_privileged(mut self, value: bool) -> Self {
        self.run_privileged = value;
        self
    }

    /// Sets docker access
    pub fn run_docker(mut self, value: bool) -> Self {
        self.run_docker = value;
        self
    }

    /// Sets whether commands are allowed
    pub fn allow_commands(mut self, value: bool) -> Self {
        self.allow_commands = value;
        self
    }

    /// Restricts the image to pipelines matching `pattern`
    pub fn allow_pipelines(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pipelines = Some(pattern.into());
        self
    }

    /// Returns true if the pipeline allow-list admits `full_repository_path`
    pub fn allows_pipeline(&self, full_repository_path: &str) -> bool {
        allow_list::is_allowed(self.allowed_pipelines.as_deref(), full_repository_path)
    }

    /// Returns true if `image_reference` refers to this image, ignoring its tag
    pub fn matches_reference(&self, image_reference: &str) -> bool {
        self.image_path == image_path_without_tag(image_reference)
    }
}

/// Strips the tag and digest from an image reference.
///
/// A colon only starts a tag after the last slash, so registry ports survive:
/// `registry:5000/extensions/gke:stable` becomes `registry:5000/extensions/gke`.
pub fn image_path_without_tag(image_reference: &str) -> &str {
    let without_digest = image_reference
        .split_once('@')
        .map_or(image_reference, |(path, _)| path);

    let name_start = without_digest.rfind('/').map_or(0, |i| i + 1);
    match without_digest[name_start..].find(':') {
        Some(colon) => &without_digest[..name_start + colon],
        None => without_digest,
    }
}

/// Registry credentials in the legacy per-repository format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRepositoryCredentialConfig {
    /// Repository the credentials apply to
    pub repository: String,
    /// Registry user
    pub username: String,
    /// Registry password
    pub password: String,
}

impl From<&ContainerRepositoryCredentialConfig> for CredentialConfig {
    fn from(legacy: &ContainerRepositoryCredentialConfig) -> Self {
        CredentialConfig::new(
            format!("container-registry-{}", legacy.repository),
            "container-registry",
        )
        .property("repository", legacy.repository.clone())
        .property("username", legacy.username.clone())
        .property("password", legacy.password.clone())
    }
}
