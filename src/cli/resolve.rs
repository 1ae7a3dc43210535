//! `pipeline-contracts resolve` - Show what a pipeline is authorized to use
//!
//! Credential properties are never printed, only their names and types.

use anyhow::{Context, Result};
use pipeline_contracts::OutputFormat;
use pipeline_contracts::contracts::{Authorization, BuilderConfig, Manifest};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Inputs of a resolution
#[derive(Debug)]
pub struct ResolveRequest<'a> {
    pub builder_config: &'a Path,
    pub manifest: Option<&'a Path>,
    pub images: &'a [String],
    pub pipeline: Option<&'a str>,
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    pub pipeline: String,
    pub trusted_images: Vec<TrustedImageSummary>,
    pub credentials: Vec<CredentialSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedImageSummary {
    pub path: String,
    pub run_privileged: bool,
    pub run_docker: bool,
    pub allow_commands: bool,
    pub injected_credential_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: String,
}

impl ResolveReport {
    fn new(pipeline: String, authorization: &Authorization) -> Self {
        Self {
            pipeline,
            trusted_images: authorization
                .trusted_images
                .iter()
                .map(|ti| TrustedImageSummary {
                    path: ti.image_path.clone(),
                    run_privileged: ti.run_privileged,
                    run_docker: ti.run_docker,
                    allow_commands: ti.allow_commands,
                    injected_credential_types: ti.injected_credential_types.clone(),
                })
                .collect(),
            credentials: authorization
                .credentials
                .iter()
                .map(|c| CredentialSummary {
                    name: c.name.clone(),
                    credential_type: c.credential_type.clone(),
                })
                .collect(),
        }
    }
}

/// Loads the catalogs and resolves the authorization of one pipeline.
///
/// Image references come from the manifest file if given, otherwise from the
/// manifest embedded in the builder config, followed by the extra images.
pub fn resolve(request: &ResolveRequest<'_>) -> Result<ResolveReport> {
    let builder_config = BuilderConfig::load(request.builder_config).with_context(|| {
        format!(
            "Failed to load builder config: {}",
            request.builder_config.display()
        )
    })?;

    let manifest = match request.manifest {
        Some(path) => Some(load_manifest(path)?),
        None => builder_config.manifest.clone(),
    };
    let mut references: Vec<String> = manifest
        .as_ref()
        .map(|m| m.container_images().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    references.extend(request.images.iter().cloned());

    let pipeline = match request.pipeline {
        Some(pipeline) => pipeline.to_string(),
        None => builder_config
            .full_repository_path()
            .context("No pipeline given and the builder config has no git section")?,
    };

    tracing::debug!(
        pipeline = %pipeline,
        images = references.len(),
        "Resolving authorization"
    );
    let authorization = builder_config.authorize(&references, &pipeline);

    Ok(ResolveReport::new(pipeline, &authorization))
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}

/// Renders a report
pub fn format_report(report: &ResolveReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "pipeline: {}", report.pipeline)?;

            writeln!(out, "trusted images:")?;
            if report.trusted_images.is_empty() {
                writeln!(out, "  none")?;
            }
            for ti in &report.trusted_images {
                writeln!(
                    out,
                    "  {} (privileged: {}, docker: {}, commands: {})",
                    ti.path, ti.run_privileged, ti.run_docker, ti.allow_commands
                )?;
            }

            write!(out, "credentials:")?;
            if report.credentials.is_empty() {
                write!(out, "\n  none")?;
            }
            for credential in &report.credentials {
                write!(out, "\n  {} ({})", credential.name, credential.credential_type)?;
            }
            Ok(out)
        }
    }
}
