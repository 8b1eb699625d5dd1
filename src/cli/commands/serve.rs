use crate::config::Config;
use crate::core::SyncService;
use crate::db::Store;
use crate::errors::AppResult;
use crate::server;
use tracing::info;

/// Handle the `serve` command (also the default).
pub fn handle(address: Option<&str>, cfg: &Config) -> AppResult<()> {
    let mut cfg = cfg.clone();
    if let Some(address) = address {
        cfg.address = address.to_string();
    }

    let store = Store::initialize_with(cfg.database_file(), cfg.store_options())?;
    info!(
        database = %store.location().display(),
        atomic_ingest = cfg.atomic_ingest,
        "store ready"
    );
    let service = SyncService::new(store);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(&cfg, service))
}
