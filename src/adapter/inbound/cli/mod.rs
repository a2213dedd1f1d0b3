//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod output;
pub mod run;
pub mod traders;

use command::{Cli, Commands, ConfigCommand, TradersCommand};

use crate::error::Result;

/// Run the parsed command.
///
/// # Errors
///
/// Returns whatever the selected handler fails with.
pub async fn execute(cli: &Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await,
        Commands::Traders(TradersCommand::List) => traders::execute_list(&cli.config).await,
        Commands::Traders(TradersCommand::Upsert(args)) => {
            traders::execute_upsert(&cli.config, &args.file).await
        }
        Commands::Traders(TradersCommand::Remove(args)) => {
            traders::execute_remove(&cli.config, &args.id).await
        }
        Commands::Config(ConfigCommand::Show) => config::execute_show(&cli.config),
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(&cli.config),
    }
}
