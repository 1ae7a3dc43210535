//! Parsed manifest stages as consumed by authorization
//!
//! Only the parts of a stage that reference container images are modeled;
//! manifest parsing itself belongs to the manifest library.

use serde::{Deserialize, Serialize};

/// The stages of a parsed manifest; other manifest sections are ignored
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Stages in declaration order
    #[serde(default)]
    pub stages: Vec<ManifestStage>,
}

impl Manifest {
    /// Collects the image references of all stages
    #[must_use]
    pub fn container_images(&self) -> Vec<&str> {
        container_images(&self.stages)
    }
}

/// A stage of a pipeline manifest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStage {
    /// Stage name
    pub name: String,

    /// Image the stage runs in; empty for stages that only group parallel stages
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub container_image: String,

    /// Stages run in parallel as part of this stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parallel_stages: Vec<ManifestStage>,

    /// Service containers running alongside this stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ManifestService>,
}

/// A service container started for a stage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestService {
    /// Service name
    pub name: String,
    /// Image the service runs in
    pub container_image: String,
}

impl ManifestStage {
    /// Creates a stage running in `container_image`
    #[must_use]
    pub fn new(name: impl Into<String>, container_image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container_image: container_image.into(),
            ..Default::default()
        }
    }

    /// Adds a parallel stage
    #[must_use]
    pub fn parallel(mut self, stage: ManifestStage) -> Self {
        self.parallel_stages.push(stage);
        self
    }

    /// Adds a service container
    #[must_use]
    pub fn service(mut self, name: impl Into<String>, container_image: impl Into<String>) -> Self {
        self.services.push(ManifestService {
            name: name.into(),
            container_image: container_image.into(),
        });
        self
    }
}

/// Collects the image references of `stages` in declaration order.
///
/// Each stage contributes its own image, then those of its parallel stages,
/// then those of its services. Stages without an image contribute nothing.
#[must_use]
pub fn container_images(stages: &[ManifestStage]) -> Vec<&str> {
    let mut images = Vec::new();

    for stage in stages {
        if !stage.container_image.is_empty() {
            images.push(stage.container_image.as_str());
        }
        for parallel in &stage.parallel_stages {
            if !parallel.container_image.is_empty() {
                images.push(parallel.container_image.as_str());
            }
        }
        for service in &stage.services {
            if !service.container_image.is_empty() {
                images.push(service.container_image.as_str());
            }
        }
    }

    images
}
