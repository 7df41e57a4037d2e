//! Storage Backup - Main entry point
//!
//! Downloads every object from a storage bucket into a timestamped
//! tar.gz archive and prunes archives past the retention window.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use storage_backup::backup::BackupRunner;
use storage_backup::config::Config;
use storage_backup::storage::supabase::SupabaseStore;
use storage_backup::utils;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bucket to back up (overrides config)
    #[arg(short, long)]
    bucket: Option<String>,

    /// Retention window in days (overrides config)
    #[arg(long)]
    retention_days: Option<i64>,

    /// Backup root directory (overrides config)
    #[arg(long)]
    backup_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {:#}", config_path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Config::default()
    };
    config.apply_env();

    if let Some(bucket) = args.bucket {
        config.backup.bucket = bucket;
    }
    if let Some(retention_days) = args.retention_days {
        config.backup.retention_days = retention_days;
    }
    if let Some(backup_root) = args.backup_root {
        config.backup.backup_root = backup_root;
    }

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    if let Err(e) = utils::logger::init(log_level, &config.log.file) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("Starting storage-backup v{}", env!("CARGO_PKG_VERSION"));

    let store = match SupabaseStore::new(&config.storage) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let runner = BackupRunner::new(store, config.backup.clone());

    tokio::select! {
        result = runner.run() => match result {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Backup failed: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Backup interrupted by user");
            ExitCode::FAILURE
        }
    }
}
