//! FileXT storage probe - CLI diagnostic for storage resolution
//!
//! Resolves the storage folder the extension would use in this environment
//! and prints a JSON report on stdout. Diagnostics go to stderr as JSON lines.
//!
//! Host arguments after `--` replace the process's own command line, e.g.
//! `filext-storage --migrate -- -name=server -profiles=/srv/profiles`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use filext_storage::models::{MigrationSummary, StorageReport};
use filext_storage::{Reporter, StaticPlatform, StorageConfig, StorageContext, SystemPlatform};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "filext-storage")]
#[command(about = "Resolve and report the FileXT storage directory")]
#[command(version)]
struct Args {
    /// Path to a JSON storage configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat this folder as the extension's module folder
    #[arg(long)]
    module_dir: Option<PathBuf>,

    /// Also migrate files out of the legacy storage folder
    #[arg(long)]
    migrate: bool,

    /// Host command-line arguments to resolve against
    #[arg(last = true)]
    host_args: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                ExitCode::from(1)
            }
        },
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<StorageReport> {
    let config = match &args.config {
        Some(path) => StorageConfig::from_json_file(path)?,
        None => StorageConfig::default(),
    };
    let reporter = Reporter::new(config.log_level);

    let mut platform = StaticPlatform::snapshot(&SystemPlatform);
    if let Some(module_dir) = &args.module_dir {
        platform.module_dir = Some(module_dir.clone());
    }
    if !args.host_args.is_empty() {
        platform.command_line_args = args.host_args.clone();
    }

    let context = StorageContext::new(Box::new(platform), config, reporter);

    let storage = context
        .storage_dir()
        .with_context(|| "Failed to resolve storage directory")?;
    let log_path = context
        .log_file_path()
        .with_context(|| "Failed to resolve log file path")?;

    let migration = args
        .migrate
        .then(|| MigrationSummary::from(&context.migrate_storage_if_needed()));

    Ok(StorageReport {
        storage_directory: storage.to_string_lossy().to_string(),
        log_file_path: log_path.to_string_lossy().to_string(),
        migration,
    })
}
