//! Command-line interface definitions.
//!
//! Defines the CLI structure for the tradefleet application using `clap`:
//! running the fleet, editing the desired-state store, and checking config.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fleet controller for model-driven trading workers
#[derive(Parser, Debug)]
#[command(name = "tradefleet")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fleet in the foreground (SIGHUP reloads, Ctrl-C stops)
    Run(RunArgs),

    /// Manage trader records in the desired-state store
    #[command(subcommand)]
    Traders(TradersCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `tradefleet run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the database path from config
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Subcommands for `tradefleet traders`.
///
/// Changes are written to the store only. A running fleet picks them up on
/// its next reload.
#[derive(Subcommand, Debug)]
pub enum TradersCommand {
    /// List stored trader records.
    List,
    /// Insert or replace a trader from a TOML or JSON file.
    Upsert(UpsertArgs),
    /// Delete a trader record.
    Remove(RemoveArgs),
}

/// Arguments for `tradefleet traders upsert`.
#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Record file (`.json` is parsed as JSON, anything else as TOML)
    pub file: PathBuf,
}

/// Arguments for `tradefleet traders remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Trader id
    pub id: String,
}

/// Subcommands for `tradefleet config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file and its seed traders.
    Validate,
}
