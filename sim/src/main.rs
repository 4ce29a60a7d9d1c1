//! flow-sim: replays governance scenarios against the flow engine.

use anyhow::Context;
use clap::Parser;
use flow_ledger::{LedgerCheckpoint, SnapshotLedger};
use flow_sim::{Scenario, SimConfig, Simulation};
use flow_utils::LogFormat;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flow-sim", about = "Replay governance scenarios against the flow engine")]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "FLOW_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file.
    #[arg(long, env = "FLOW_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the config file.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario and print a JSON report.
    Run {
        /// Path to the scenario TOML file.
        #[arg(long)]
        scenario: PathBuf,

        /// Write a ledger checkpoint here after the run.
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },
    /// Verify a ledger checkpoint and print a summary.
    Inspect {
        /// Path to a checkpoint written by `run --checkpoint`.
        file: PathBuf,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::from_toml_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    flow_utils::init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Run {
            scenario,
            checkpoint,
        } => {
            let scenario = Scenario::from_toml_file(&scenario)?;
            let mut sim = Simulation::new(config);
            let outcome = sim.run(&scenario);

            println!("{}", sim.report(&scenario)?.to_json()?);
            if let Some(path) = checkpoint {
                let checkpoint = sim.checkpoint()?;
                std::fs::write(&path, checkpoint.to_bytes()?)
                    .with_context(|| format!("writing checkpoint to {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    hash = %hex::encode(checkpoint.hash),
                    "checkpoint written"
                );
            }
            outcome?;
        }
        Command::Inspect { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading checkpoint {}", file.display()))?;
            let checkpoint = LedgerCheckpoint::from_bytes(&bytes)?;
            let ledger = SnapshotLedger::restore(&checkpoint)?;
            let summary = json!({
                "hash": hex::encode(checkpoint.hash),
                "level": checkpoint.level,
                "version": checkpoint.version,
                "accounts": checkpoint.account_count(),
                "administrator": ledger.administrator(),
                "minting_disabled": ledger.is_minting_disabled(),
                "total_supply": ledger.total_supply().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Config => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
