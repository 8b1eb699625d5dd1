#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use resh_sync_sqlite::core::SyncService;
use resh_sync_sqlite::db::{Store, StoreOptions};
use resh_sync_sqlite::models::Record;
use resh_sync_sqlite::server;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::sync::oneshot;

pub fn app() -> Command {
    cargo_bin_cmd!("resh-sync-sqlite")
}

/// Fresh database path inside a temp dir that lives as long as the guard.
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("resh-sync.sqlite");
    (dir, path)
}

pub fn temp_store() -> (TempDir, Store) {
    temp_store_with(StoreOptions::default())
}

pub fn temp_store_with(options: StoreOptions) -> (TempDir, Store) {
    let (dir, path) = temp_db();
    let store = Store::initialize_with(&path, options).expect("initialize store");
    (dir, store)
}

/// Minimal record with the required fields only.
pub fn rec(id: &str, device: &str, time: &str) -> Record {
    Record::new(
        id,
        device,
        "session-1",
        format!("echo {id}"),
        time.parse().expect("timestamp"),
    )
}

/// `n` records for one device, one second apart starting at `start`.
pub fn many(prefix: &str, device: &str, n: usize, start: i64) -> Vec<Record> {
    (0..n)
        .map(|i| {
            rec(
                &format!("{prefix}-{i}"),
                device,
                &format!("{}.0000", start + i as i64),
            )
        })
        .collect()
}

pub fn sorted_ids(records: &[Record]) -> Vec<String> {
    let mut ids: Vec<String> = records.iter().map(|r| r.record_id.clone()).collect();
    ids.sort();
    ids
}

/// Serve `service` on an ephemeral port. Drop or fire the sender to stop.
pub async fn spawn_server(service: SyncService) -> (String, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server::serve_on(listener, service, async move {
            let _ = shutdown_rx.await;
        })
        .await;
    });
    (format!("http://{}", addr), shutdown_tx)
}
