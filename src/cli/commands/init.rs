use crate::config::Config;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// Creates the SQLite file if needed and makes sure the `records` table
/// and its indexes exist. Running it again is a no-op.
pub fn handle(cfg: &Config) -> AppResult<()> {
    info(format!("Database: {}", cfg.sqlite_path));

    let store = Store::initialize_with(cfg.database_file(), cfg.store_options())?;
    let records = store.count()?;

    success(format!(
        "Database initialized at {} ({} records)",
        store.location().display(),
        records
    ));
    Ok(())
}
