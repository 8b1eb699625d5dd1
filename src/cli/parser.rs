use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for resh-sync-sqlite
/// Sync endpoint for RESH shell history backed by SQLite
#[derive(Parser)]
#[command(
    name = "resh-sync-sqlite",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sync endpoint for RESH shell history records, backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Config path, absolute or relative to the working directory
    #[arg(
        global = true,
        long = "config",
        alias = "configPath",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    pub verbose: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP sync endpoint
    Serve {
        /// Override the listen address from the config file
        #[arg(long = "address")]
        address: Option<String>,
    },

    /// Create the database and its schema (safe to repeat)
    Init,

    /// Show or validate the configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Fail if the configuration file cannot be parsed")]
        check: bool,
    },

    /// Database maintenance
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}
