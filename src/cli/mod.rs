//! Operator CLI for pipeline contracts
//!
//! - `resolve`: Show the trusted images and credentials a pipeline would get
//! - `status`: Aggregate the status of a build or release log
//! - `completions`: Generate shell completions

pub mod completions;
pub mod resolve;
pub mod status;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use pipeline_contracts::{Config, OutputFormat, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI arguments for pipeline-contracts
#[derive(Parser, Debug)]
#[command(name = "pipeline-contracts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file
    #[arg(long, global = true, default_value = "pipeline-contracts.yaml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the trusted images and credentials granted to a pipeline
    Resolve {
        /// Builder config holding the credential and trusted image catalogs
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Manifest stages to take image references from
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// Additional image reference, may be repeated
        #[arg(short, long = "image")]
        images: Vec<String>,
        /// Full repository path of the pipeline (defaults to the config's git section)
        #[arg(short, long)]
        pipeline: Option<String>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Aggregate the status of a build or release log
    Status {
        /// Log file in JSON
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    Args::command()
}

/// Parse and execute CLI arguments
pub fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config::load_or_default(&args.settings)
        .with_context(|| format!("Failed to load settings: {}", args.settings.display()))?;
    init_logging(args.log_level.as_deref().unwrap_or(&config.log_level));

    match args.command {
        Command::Resolve {
            config: builder_config,
            manifest,
            images,
            pipeline,
            format,
        } => {
            let builder_config = builder_config
                .or_else(|| config.builder_config_path.clone())
                .context("No builder config given and none set in the settings")?;

            let report = resolve::resolve(&resolve::ResolveRequest {
                builder_config: &builder_config,
                manifest: manifest.as_deref(),
                images: &images,
                pipeline: pipeline.as_deref(),
            })?;

            let format = format.map_or(config.output_format, OutputFormat::from);
            println!("{}", resolve::format_report(&report, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Status { file, format } => {
            let report = status::aggregate_file(&file)?;

            let format = format.map_or(config.output_format, OutputFormat::from);
            println!("{}", status::format_report(&report, format)?);

            if report.succeeded {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, &output_path)?;
            } else {
                println!("{completions}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
