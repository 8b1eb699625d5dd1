use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        // ---- CHECK CONFIG ----
        if *check {
            ConfigLogic::check(path)?;
            success(format!("Configuration file {} is valid", path.display()));
        }

        // ---- PRINT CONFIG ----
        if *print_config {
            print!("{}", ConfigLogic::render(cfg)?);
        }
    }

    Ok(())
}
