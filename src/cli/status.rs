//! `pipeline-contracts status` - Aggregate the status of a log

use anyhow::{Context, Result};
use pipeline_contracts::OutputFormat;
use pipeline_contracts::contracts::{BuildLog, ReleaseLog, Status};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A build or release log, told apart by their identifying fields
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LogDocument {
    Build(BuildLog),
    Release(ReleaseLog),
}

/// Aggregated status of one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub kind: &'static str,
    pub status: Status,
    pub succeeded: bool,
}

/// Reads a log and aggregates its steps
pub fn aggregate_file(path: &Path) -> Result<StatusReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log: {}", path.display()))?;
    let document: LogDocument = serde_json::from_str(&content)
        .with_context(|| format!("Not a build or release log: {}", path.display()))?;

    let report = match document {
        LogDocument::Build(log) => StatusReport {
            kind: "build",
            status: log.aggregated_status(),
            succeeded: log.has_succeeded_status(),
        },
        LogDocument::Release(log) => StatusReport {
            kind: "release",
            status: log.aggregated_status(),
            succeeded: log.has_succeeded_status(),
        },
    };

    tracing::debug!(kind = report.kind, status = %report.status, "Aggregated log status");
    Ok(report)
}

/// Renders a report
pub fn format_report(report: &StatusReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
        OutputFormat::Text => {
            let status = match report.status {
                Status::Unknown => "unknown",
                other => other.as_str(),
            };
            Ok(format!("{} {status}", report.kind))
        }
    }
}
