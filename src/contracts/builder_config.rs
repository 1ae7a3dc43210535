//! Builder configuration
//!
//! The document a CI server hands to a builder job: what to build or release,
//! where to report back, and the credentials and trusted images the job may
//! use. Catalog documents use the same shape with only the credential and
//! trusted image sections filled in.

use super::authorization::{self, CredentialsByType};
use super::credentials::{CredentialConfig, TrustedImageConfig};
use super::errors::ContractError;
use super::manifest::Manifest;
use super::repository::RepositoryRef;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a build or release job
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Action to perform, `build` or `release`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Builder release track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,

    /// Docker registry mirror for the docker daemon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_mirror: Option<String>,

    /// MTU of the docker-in-docker daemon
    #[serde(default, rename = "dindMtu", skip_serializing_if = "Option::is_none")]
    pub docker_daemon_mtu: Option<String>,

    /// Bridge IP of the docker-in-docker daemon
    #[serde(default, rename = "dindBip", skip_serializing_if = "Option::is_none")]
    pub docker_daemon_bip: Option<String>,

    /// User defined docker network for service containers
    #[serde(default, rename = "dindNetwork", skip_serializing_if = "Option::is_none")]
    pub docker_network: Option<DockerNetworkConfig>,

    /// Parsed manifest of the pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,

    /// Name of the kubernetes job running the builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,

    /// Release target name for release jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    /// Where to reach the CI server
    #[serde(default, rename = "ciServer", skip_serializing_if = "Option::is_none")]
    pub ci_server: Option<CiServerConfig>,

    /// Build specific parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_params: Option<BuildParamsConfig>,

    /// Release specific parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_params: Option<ReleaseParamsConfig>,

    /// Repository to clone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitConfig>,

    /// Version being built or released
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_version: Option<BuildVersionConfig>,

    /// Credential catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialConfig>,

    /// Trusted image catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_images: Vec<TrustedImageConfig>,
}

/// Trusted images and credentials granted to one pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// Trusted images the pipeline uses and is allowed to use
    pub trusted_images: Vec<TrustedImageConfig>,
    /// Credentials injected into those images
    pub credentials: Vec<CredentialConfig>,
}

impl BuilderConfig {
    /// Parses a YAML document
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Yaml`] if the document is not valid.
    pub fn from_yaml_str(document: &str) -> Result<Self, ContractError> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Parses a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Json`] if the document is not valid.
    pub fn from_json_str(document: &str) -> Result<Self, ContractError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Loads a YAML or JSON document, chosen by file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension
    /// or does not parse.
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let document = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&document),
            Some("json") => Self::from_json_str(&document),
            _ => Err(ContractError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Full repository path `source/owner/name` of the configured repository
    #[must_use]
    pub fn full_repository_path(&self) -> Option<String> {
        self.git.as_ref().map(GitConfig::full_repo_path)
    }

    /// Returns all credentials of a type
    #[must_use]
    pub fn credentials_by_type(&self, credential_type: &str) -> Vec<&CredentialConfig> {
        authorization::credentials_by_type(&self.credentials, credential_type)
    }

    /// Looks up the trusted image for an image reference, ignoring its tag
    #[must_use]
    pub fn trusted_image(&self, image_reference: &str) -> Option<&TrustedImageConfig> {
        authorization::trusted_image(&self.trusted_images, image_reference)
    }

    /// Returns the credentials `trusted_image` may receive, grouped by type
    #[must_use]
    pub fn credentials_for_trusted_image<'a>(
        &'a self,
        trusted_image: &'a TrustedImageConfig,
    ) -> CredentialsByType<'a> {
        authorization::resolve_credentials_for_trusted_image(&self.credentials, trusted_image)
    }

    /// Resolves the trusted images and credentials for a pipeline's images
    #[must_use]
    pub fn authorize<S: AsRef<str>>(
        &self,
        image_references: &[S],
        full_repository_path: &str,
    ) -> Authorization {
        let trusted_images = authorization::resolve_trusted_images(
            &self.trusted_images,
            image_references,
            full_repository_path,
        );
        let credentials = authorization::resolve_credentials(
            &self.credentials,
            trusted_images.iter().copied(),
            full_repository_path,
        );

        tracing::debug!(
            pipeline = %full_repository_path,
            trusted_images = trusted_images.len(),
            credentials = credentials.len(),
            "Resolved pipeline authorization"
        );

        Authorization {
            trusted_images: trusted_images.into_iter().cloned().collect(),
            credentials: credentials.into_iter().cloned().collect(),
        }
    }

    /// Resolves the authorization for the configured manifest and repository.
    ///
    /// Without a manifest no image is used; without git settings no pipeline
    /// path is known and only unrestricted entries apply.
    #[must_use]
    pub fn authorize_manifest(&self) -> Authorization {
        let images = self
            .manifest
            .as_ref()
            .map(Manifest::container_images)
            .unwrap_or_default();
        let path = self.full_repository_path().unwrap_or_default();
        self.authorize(&images, &path)
    }

    /// Replaces the catalogs with the entries granted by `authorization`
    #[must_use]
    pub fn with_authorization(mut self, authorization: Authorization) -> Self {
        self.trusted_images = authorization.trusted_images;
        self.credentials = authorization.credentials;
        self
    }
}

/// Repository and revision to clone
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfig {
    /// Source host, e.g. `github.com`
    pub repo_source: String,
    /// Repository owner
    pub repo_owner: String,
    /// Repository name
    pub repo_name: String,
    /// Branch
    pub repo_branch: String,
    /// Commit revision
    pub repo_revision: String,
}

/// Version number being built or released
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildVersionConfig {
    /// Full semantic version
    pub version: String,
    /// Major part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<i32>,
    /// Minor part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<i32>,
    /// Patch part, may carry a label suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
    /// Pre-release label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Auto incrementing build counter
    #[serde(default, rename = "autoincrement", skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<i32>,
}

/// Communication settings for the CI server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiServerConfig {
    /// Base URL of the web interface
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// Endpoint receiving builder events
    #[serde(rename = "builderEventsUrl")]
    pub builder_events_url: String,
    /// Endpoint receiving logs
    #[serde(rename = "postLogsUrl")]
    pub post_logs_url: String,
    /// Key authenticating the builder
    pub api_key: String,
}

/// User defined docker network making services reachable by name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DockerNetworkConfig {
    /// Network name
    pub name: String,
    /// Subnet in CIDR notation
    pub subnet: String,
    /// Gateway address
    pub gateway: String,
}

/// Build specific parameters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildParamsConfig {
    /// Build identifier
    #[serde(rename = "buildID")]
    pub build_id: i64,
}

/// Release specific parameters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseParamsConfig {
    /// Release target name
    pub release_name: String,
    /// Release identifier
    #[serde(rename = "releaseID")]
    pub release_id: i64,
    /// Action within the release target
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_action: String,
    /// Who triggered the release
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub triggered_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::manifest::ManifestStage;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CATALOG_YAML: &str = r"
credentials:
- name: container-registry-extensions
  type: container-registry
  repository: extensions
  username: username
  password: secret
- name: container-registry-private
  type: container-registry
  repository: private
  username: username
  password: secret
  allowedPipelines: github.com/org/.+
- name: gke-production
  type: kubernetes-engine
  project: production
  region: europe-west2
  allowedTrustedImages: extensions/gke
- name: gke-development
  type: kubernetes-engine
  project: development
  region: europe-west2
- name: bitbucket-api-token
  type: bitbucket-api-token
  token: sometoken
- name: github-api-token
  type: github-api-token
  token: sometoken
- name: slack-webhook
  type: slack-webhook
  webhook: somewebhookurl

trustedImages:
- path: extensions/docker
  runDocker: true
  injectedCredentialTypes:
  - container-registry
- path: extensions/gke
  injectedCredentialTypes:
  - kubernetes-engine
- path: extensions/bitbucket-status
  injectedCredentialTypes:
  - bitbucket-api-token
- path: extensions/github-status
  injectedCredentialTypes:
  - github-api-token
- path: extensions/slack-build-status
  injectedCredentialTypes:
  - slack-webhook
- path: docker
  runDocker: true
- path: multiple-git-sources-test
  allowCommands: true
  injectedCredentialTypes:
  - bitbucket-api-token
  - github-api-token
- path: builder/ci-builder
  runPrivileged: true
";

    const JOB_JSON: &str = r#"{
  "action": "build",
  "track": "dev",
  "git": {
    "repoSource": "github.com",
    "repoOwner": "org",
    "repoName": "service",
    "repoBranch": "main",
    "repoRevision": "3adf11c158811dbf0b94ca5bdbbdae79fffe7852"
  },
  "buildVersion": {
    "version": "0.1.67-rc.1",
    "major": 0,
    "minor": 1,
    "patch": "67-rc.1",
    "autoincrement": 67
  },
  "buildParams": { "buildID": 42 },
  "ciServer": {
    "baseUrl": "https://ci.example.com/",
    "builderEventsUrl": "https://ci.example.com/api/commands",
    "postLogsUrl": "https://ci.example.com/api/pipelines/github.com/org/service/builds/42/logs",
    "apiKey": "key"
  },
  "manifest": {
    "stages": [
      { "name": "build", "containerImage": "golang:1.22" },
      { "name": "push", "containerImage": "extensions/docker:stable" },
      { "name": "deploy", "containerImage": "extensions/gke:stable" }
    ]
  },
  "credentials": [
    { "name": "container-registry-extensions", "type": "container-registry", "repository": "extensions" },
    { "name": "gke-production", "type": "kubernetes-engine", "allowedPipelines": "github.com/org/other" }
  ],
  "trustedImages": [
    { "path": "extensions/docker", "runDocker": true, "injectedCredentialTypes": ["container-registry"] },
    { "path": "extensions/gke", "injectedCredentialTypes": ["kubernetes-engine"] }
  ]
}"#;

    #[test]
    fn test_catalog_from_yaml() {
        let config = BuilderConfig::from_yaml_str(CATALOG_YAML).unwrap();

        assert_eq!(config.credentials.len(), 7);
        let types: Vec<&str> = config
            .credentials
            .iter()
            .map(|c| c.credential_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "container-registry",
                "container-registry",
                "kubernetes-engine",
                "kubernetes-engine",
                "bitbucket-api-token",
                "github-api-token",
                "slack-webhook",
            ]
        );
        assert_eq!(config.credentials[0].string_property("password"), Some("secret"));
        assert_eq!(config.credentials[2].string_property("project"), Some("production"));

        assert_eq!(config.trusted_images.len(), 8);
        assert!(config.trusted_images[0].run_docker);
        assert!(config.trusted_images[7].run_privileged);
        assert_eq!(
            config.trusted_images[6].injected_credential_types,
            vec!["bitbucket-api-token", "github-api-token"]
        );
    }

    #[test]
    fn test_job_from_json() {
        let config = BuilderConfig::from_json_str(JOB_JSON).unwrap();

        assert_eq!(config.action.as_deref(), Some("build"));
        assert_eq!(config.track.as_deref(), Some("dev"));
        assert_eq!(
            config.full_repository_path().as_deref(),
            Some("github.com/org/service")
        );

        let version = config.build_version.as_ref().unwrap();
        assert_eq!(version.version, "0.1.67-rc.1");
        assert_eq!(version.major, Some(0));
        assert_eq!(version.minor, Some(1));
        assert_eq!(version.patch.as_deref(), Some("67-rc.1"));
        assert_eq!(version.auto_increment, Some(67));

        assert_eq!(config.build_params.as_ref().unwrap().build_id, 42);
        assert_eq!(config.ci_server.as_ref().unwrap().api_key, "key");
    }

    #[test]
    fn test_lookups() {
        let config = BuilderConfig::from_yaml_str(CATALOG_YAML).unwrap();

        let gke = config.trusted_image("extensions/gke:stable").unwrap();
        assert!(!gke.run_docker);
        assert!(config.trusted_image("golang:1.11.1-alpine").is_none());

        assert_eq!(config.credentials_by_type("container-registry").len(), 2);
        assert!(config.credentials_by_type("aws-token").is_empty());

        let git = config.trusted_image("multiple-git-sources-test").unwrap();
        assert_eq!(config.credentials_for_trusted_image(git).len(), 2);

        let docker = config.trusted_image("docker").unwrap();
        assert!(config.credentials_for_trusted_image(docker).is_empty());
    }

    #[test]
    fn test_authorize() {
        let config = BuilderConfig::from_yaml_str(CATALOG_YAML).unwrap();
        let stages = vec![
            ManifestStage::new("build", "golang:1.22"),
            ManifestStage::new("push", "extensions/docker:stable"),
            ManifestStage::new("deploy", "extensions/gke:stable"),
            ManifestStage::new("notify", "extensions/slack-build-status:stable"),
        ];
        let images = crate::contracts::manifest::container_images(&stages);

        let authorization = config.authorize(&images, "bitbucket.org/team/service");

        let image_paths: Vec<&str> = authorization
            .trusted_images
            .iter()
            .map(|i| i.image_path.as_str())
            .collect();
        assert_eq!(
            image_paths,
            vec!["extensions/docker", "extensions/gke", "extensions/slack-build-status"]
        );

        let credential_names: Vec<&str> = authorization
            .credentials
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            credential_names,
            vec![
                "container-registry-extensions",
                "gke-production",
                "gke-development",
                "slack-webhook",
            ]
        );
    }

    #[test]
    fn test_authorize_manifest_and_restrict() {
        let config = BuilderConfig::from_json_str(JOB_JSON).unwrap();

        let authorization = config.authorize_manifest();
        assert_eq!(authorization.trusted_images.len(), 2);
        assert_eq!(authorization.credentials.len(), 1);
        assert_eq!(authorization.credentials[0].name, "container-registry-extensions");

        let restricted = config.clone().with_authorization(authorization);
        assert_eq!(restricted.credentials.len(), 1);
        assert_eq!(restricted.git, config.git);
    }

    #[test]
    fn test_authorize_without_manifest() {
        let config = BuilderConfig::from_yaml_str(CATALOG_YAML).unwrap();

        let authorization = config.authorize_manifest();

        assert!(authorization.trusted_images.is_empty());
        assert!(authorization.credentials.is_empty());
    }

    #[test]
    fn test_load_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(CATALOG_YAML.as_bytes()).unwrap();
        assert_eq!(BuilderConfig::load(yaml.path()).unwrap().trusted_images.len(), 8);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(JOB_JSON.as_bytes()).unwrap();
        assert_eq!(BuilderConfig::load(json.path()).unwrap().credentials.len(), 2);

        let toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            BuilderConfig::load(toml.path()),
            Err(ContractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            BuilderConfig::from_json_str("{"),
            Err(ContractError::Json(_))
        ));
        assert!(matches!(
            BuilderConfig::from_yaml_str("credentials: 7"),
            Err(ContractError::Yaml(_))
        ));
    }

    #[test]
    fn test_serialize_skips_empty_sections() {
        let config = BuilderConfig {
            track: Some("stable".to_string()),
            trusted_images: vec![TrustedImageConfig::new("docker").run_docker(true)],
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(
            json,
            r#"{"track":"stable","trustedImages":[{"path":"docker","runPrivileged":false,"runDocker":true,"allowCommands":false}]}"#
        );
    }
}
