use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guniq", version, about = "GunIQ: firearm price & loadout tracker")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "guniq.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List firearms in the catalog (default)
    Catalog {
        /// Filter by name or caliber (e.g. Glock, Sig, 9mm)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Build a loadout: fetch attachment prices and total the selection
    Loadout {
        /// Firearm name as listed in the catalog
        firearm: String,

        /// Attachment to include (repeatable)
        #[arg(short, long = "attachment")]
        attachments: Vec<String>,

        /// Fetch attachment prices concurrently
        #[arg(long)]
        concurrent: bool,

        /// Print fetch metrics in Prometheus text format afterwards
        #[arg(long)]
        metrics: bool,
    },

    /// Sign in with the configured identity provider
    Login,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Validate the configuration
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Catalog if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Catalog { search: None })
    }
}
