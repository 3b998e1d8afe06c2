//! Tickjobs CLI - register and inspect tick capture jobs

use clap::{Parser, Subcommand};
use anyhow::Context as _;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tickjobs::config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "tickjobs")]
#[command(version)]
#[command(about = "Tick capture job registry - jobs, instruments and fields in SQLite")]
#[command(long_about = r#"
Tickjobs keeps a registry of scheduled tick capture jobs:
  • Jobs with a start time, duration and lifecycle status
  • Instruments and fields associated with each job
  • Constraint-checked storage in a local SQLite database

Example usage:
  tickjobs init
  tickjobs add --name "Dummy job 1" --start 1700000000 --duration 15 \
      --instrument "NKY Index,USDJPY Curncy" --field BID,ASK,LAST_PRICE
  tickjobs list --limit 10
  tickjobs status 1 running
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress headers and banners in human output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also append log records to this file (no colors)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Register a job with its instruments and fields
    Add {
        /// Job name
        #[arg(short, long)]
        name: String,

        /// Start time (Unix seconds or RFC 3339)
        #[arg(short, long)]
        start: String,

        /// Duration in minutes
        #[arg(long, conflicts_with = "end", required_unless_present = "end")]
        duration: Option<i64>,

        /// End time (Unix seconds or RFC 3339); the duration is derived in whole minutes
        #[arg(short, long)]
        end: Option<String>,

        /// Instrument names (repeatable or comma-separated)
        #[arg(short, long = "instrument", value_delimiter = ',')]
        instruments: Vec<String>,

        /// Field names (repeatable or comma-separated)
        #[arg(short, long = "field", value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// List the most recently registered jobs
    List {
        /// Maximum number of jobs
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a job with its instruments and fields
    Show {
        /// Job id
        job_id: i64,
    },

    /// List jobs whose capture window contains a point in time
    Active {
        /// Point in time (Unix seconds or RFC 3339); defaults to now
        #[arg(short, long)]
        at: Option<String>,
    },

    /// Change a job's status
    Status {
        /// Job id
        job_id: i64,

        /// New status (NOT STARTED, RUNNING, COMPLETED, FAILED)
        status: String,
    },

    /// Delete a job and its associations
    Delete {
        /// Job id
        job_id: i64,
    },

    /// Show statistics about the registry
    Stats,

    /// Print the version
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Active { .. } => "active",
            Commands::Status { .. } => "status",
            Commands::Delete { .. } => "delete",
            Commands::Stats => "stats",
            Commands::Version => "version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print the success envelope in JSON mode; human output is printed by each command
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn emit_error(output_mode: OutputMode, command: &str, err: &anyhow::Error) {
    match output_mode {
        OutputMode::Human => tickjobs::ui::error(&format!("{:#}", err)),
        OutputMode::Json => {
            let envelope = serde_json::json!({
                "ok": false,
                "command": command,
                "error": format!("{:#}", err),
            });
            println!("{}", envelope);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command = cli.command.name();

    if let Err(err) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        emit_error(output_mode, command, &err);
        return ExitCode::FAILURE;
    }
    tickjobs::output::init_quiet(cli.quiet);

    match run(cli, output_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{} failed: {:?}", command, err);
            emit_error(output_mode, command, &err);
            ExitCode::FAILURE
        }
    }
}

/// Stderr logging, plus an append-only file layer when `--log-file` is given.
/// RUST_LOG wins over --verbose.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();
    let cwd = std::env::current_dir()?;
    let database = loaded.database_path(cli.database.as_deref(), &cwd);

    let ctx = commands::Context {
        output_mode,
        config_path,
        config: loaded,
        database,
        project_root: cwd,
    };

    match cli.command {
        Commands::Init { force } => commands::run_init(&ctx, force),
        Commands::Add { name, start, duration, end, instruments, fields } => {
            let args = commands::AddArgs { name, start, duration, end, instruments, fields };
            commands::run_add(&ctx, args)
        }
        Commands::List { limit } => commands::run_list(&ctx, limit),
        Commands::Show { job_id } => commands::run_show(&ctx, job_id),
        Commands::Active { at } => commands::run_active(&ctx, at.as_deref()),
        Commands::Status { job_id, status } => commands::run_status(&ctx, job_id, &status),
        Commands::Delete { job_id } => commands::run_delete(&ctx, job_id),
        Commands::Stats => commands::run_stats(&ctx),
        Commands::Version => commands::run_version(output_mode),
    }
}
