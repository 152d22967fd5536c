use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use warbler_core::config::Config;
use warbler_core::core_ledger::{CallContext, Ledger, SharedLedger, SnapshotFile};
use warbler_core::logging::{init_logging_with_config, LogConfig, LogLevel};

mod commands;

use commands::{execute, Command};

#[derive(Parser, Debug)]
#[command(name = "warbler")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger snapshot file (overrides the configured path)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Identity the command is issued by
    #[arg(long = "as", value_name = "IDENTITY", default_value = "")]
    caller: String,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::from_env()?,
    };

    let mut log_config = LogConfig::from(&config.logging);
    if let Some(level) = &args.log_level {
        log_config.level = level.parse::<LogLevel>()?;
    }
    if args.json_logs {
        log_config.json_format = true;
    }
    init_logging_with_config(log_config)?;

    if config.metrics.enabled {
        warbler_core::metrics::init_metrics();
    }

    let state_path = args.state.unwrap_or(config.store.snapshot_path);
    let ledger = SharedLedger::from_ledger(load(&state_path)?);
    debug!(path = %state_path.display(), "Ledger loaded");

    let ctx = CallContext::new(args.caller);
    let is_write = args.command.is_write();
    let output = execute(&ledger, &ctx, args.command).await?;

    if is_write || config.store.save_after_reads {
        SnapshotFile::save(&state_path, &ledger.snapshot().await)
            .with_context(|| format!("saving ledger to {}", state_path.display()))?;
        info!(path = %state_path.display(), "Ledger saved");
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load(path: &Path) -> Result<Ledger> {
    SnapshotFile::load_ledger(path)
        .with_context(|| format!("loading ledger from {}", path.display()))
}
