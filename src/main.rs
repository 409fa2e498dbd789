use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use gun_iq::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Configuration decides the log level and format, so load it first
    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.logging);

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Catalog { search } => {
            commands::catalog::execute(&cfg, search).await?;
        }
        cli::Commands::Loadout {
            firearm,
            attachments,
            concurrent,
            metrics,
        } => {
            commands::loadout::execute(&cfg, &firearm, &attachments, concurrent, metrics).await?;
        }
        cli::Commands::Login => {
            commands::login::execute(&cfg).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
            cli::ConfigCommands::Validate => commands::config::validate(&cfg)?,
        },
        cli::Commands::Version => {
            println!("GunIQ v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
