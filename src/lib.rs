//! resh-sync-sqlite library root.
//! Exposes the record store, the sync service, the HTTP router and the
//! high-level run() used by the binary.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        None => cli::commands::serve::handle(None, cfg),
        Some(Commands::Serve { address }) => cli::commands::serve::handle(address.as_deref(), cfg),
        Some(Commands::Init) => cli::commands::init::handle(cfg),
        Some(cmd @ Commands::Config { .. }) => cli::commands::config::handle(cmd, cfg, &cli.config),
        Some(cmd @ Commands::Db { .. }) => cli::commands::db::handle(cmd, cfg),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = Config::load(&cli.config);
    if let Some(custom_db) = &cli.db {
        cfg.sqlite_path = custom_db.clone();
    }
    tracing::info!(config_file = %cli.config.display(), ?cfg, "configuration loaded");

    dispatch(&cli, &cfg)
}
