//! pipeline-contracts - operator CLI for CI/CD contracts
//!
//! ## Commands
//!
//! - `pipeline-contracts resolve` - Show the trusted images and credentials a pipeline gets
//! - `pipeline-contracts status` - Aggregate the status of a build or release log
//! - `pipeline-contracts completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # What would this pipeline get injected?
//! pipeline-contracts resolve --config builder-config.yaml --pipeline github.com/org/service
//!
//! # Did this build succeed?
//! pipeline-contracts status build-log.json
//!
//! # Generate shell completions
//! pipeline-contracts completions bash > /etc/bash_completion.d/pipeline-contracts
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if std::env::var("PIPELINE_CONTRACTS_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
