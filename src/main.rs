//! resh-sync-sqlite main entrypoint.

use resh_sync_sqlite::run;
use resh_sync_sqlite::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
