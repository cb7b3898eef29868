//! stig-tools: STIG checklist ingestion and SCAP merge tool
//!
//! Ingests DISA checklist (.ckl) and SCAP scan result (.xml) uploads,
//! merges scan results into checklist templates, and stores the results.

#![allow(clippy::too_many_lines)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use stig_tools::{
    cli,
    config::{
        IngestConfig, InspectConfig, MergeConfig, OutputConfig, TemplatesConfig, UpdateConfig,
        default_store_dir,
    },
    pipeline::SystemGroupRef,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported Input Formats:",
        "\n  CKL:   DISA STIG Viewer checklists (.ckl)",
        "\n  XCCDF: SCAP scan result documents (.xml)",
        "\n\nFeatures:",
        "\n  Scan-to-checklist merge, template lookup, artifact storage"
    )
}

#[derive(Parser)]
#[command(name = "stig-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "STIG checklist ingestion and SCAP merge tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  All files processed successfully
    1  One or more files failed to ingest

EXAMPLES:
    # Ingest checklists and scan results into the local store
    stig-tools ingest scans/*.xml checklists/*.ckl --templates templates/

    # Attach uploads to a system group
    stig-tools ingest results.xml --system-group-id SG-12 --system-title \"Lab enclave\"

    # Re-run a newer scan against a stored artifact
    stig-tools update 1f7c0a8d2b94e630 rescan.xml

    # Merge a scan into a checklist template without storing anything
    stig-tools merge results.xml template.ckl -O merged.ckl

    # Show what a file contains
    stig-tools inspect host.ckl")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs (extracted for readability)
// ============================================================================

/// Arguments for the `ingest` subcommand
#[derive(Parser)]
struct IngestArgs {
    /// Checklist (.ckl) and scan result (.xml) files to ingest
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// System group to attach ingested artifacts to
    #[arg(long, env = "STIG_TOOLS_SYSTEM_GROUP")]
    system_group_id: Option<String>,

    /// Human-readable title for the system group
    #[arg(long)]
    system_title: Option<String>,

    /// Directory of checklist templates used when merging scan results
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Template service base URL (requires the `remote` feature)
    #[arg(long, env = "STIG_TOOLS_TEMPLATE_URL", conflicts_with = "templates")]
    template_url: Option<String>,

    /// Template service timeout in seconds (default: 30)
    #[arg(long, default_value = "30")]
    template_timeout: u64,

    /// Artifact store directory (default: platform data dir)
    #[arg(long, env = "STIG_TOOLS_STORE")]
    store: Option<PathBuf>,

    /// Emit a JSON summary instead of plain text
    #[arg(long)]
    json: bool,
}

/// Arguments for the `update` subcommand
#[derive(Parser)]
struct UpdateArgs {
    /// Identifier of the stored artifact to update
    id: String,

    /// Replacement checklist (.ckl) or rescan result (.xml)
    file: PathBuf,

    /// Artifact store directory (default: platform data dir)
    #[arg(long, env = "STIG_TOOLS_STORE")]
    store: Option<PathBuf>,

    /// Emit a JSON summary instead of plain text
    #[arg(long)]
    json: bool,
}

/// Arguments for the `inspect` subcommand
#[derive(Parser)]
struct InspectArgs {
    /// Checklist (.ckl) or scan result (.xml) file
    file: PathBuf,

    /// Emit a JSON summary instead of plain text
    #[arg(long)]
    json: bool,
}

/// Arguments for the `merge` subcommand
#[derive(Parser)]
struct MergeArgs {
    /// SCAP scan result document (.xml)
    scan: PathBuf,

    /// Checklist template to merge results into (.ckl)
    template: PathBuf,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Treat the template as an already-graded checklist (failing rules keep
    /// their recorded status)
    #[arg(long)]
    existing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest checklists and scan results into the artifact store
    Ingest(IngestArgs),

    /// Replace a stored artifact with a newer upload
    Update(UpdateArgs),

    /// Summarize a checklist or scan result file
    Inspect(InspectArgs),

    /// Merge scan results into a checklist template
    Merge(MergeArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Ingest(args) => {
            let config = IngestConfig {
                files: args.files,
                system_group: SystemGroupRef {
                    id: args.system_group_id,
                    title: args.system_title,
                },
                templates: TemplatesConfig {
                    dir: args.templates,
                    url: args.template_url,
                    timeout_secs: args.template_timeout,
                },
                store_dir: args.store.unwrap_or_else(default_store_dir),
                output: OutputConfig {
                    json: args.json,
                    quiet: cli.quiet,
                },
            };

            let exit_code = cli::run_ingest(config)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Update(args) => {
            let config = UpdateConfig {
                id: args.id,
                file: args.file,
                store_dir: args.store.unwrap_or_else(default_store_dir),
                output: OutputConfig {
                    json: args.json,
                    quiet: cli.quiet,
                },
            };

            let exit_code = cli::run_update(config)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Inspect(args) => {
            let config = InspectConfig {
                file: args.file,
                output: OutputConfig {
                    json: args.json,
                    quiet: cli.quiet,
                },
            };

            let exit_code = cli::run_inspect(config)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Merge(args) => {
            let config = MergeConfig {
                scan: args.scan,
                template: args.template,
                output_file: args.output_file,
                existing: args.existing,
            };

            let exit_code = cli::run_merge(config)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "stig-tools", &mut io::stdout());
        }
    }

    Ok(())
}
