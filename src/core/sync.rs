//! The three sync operations on top of the record store.

use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Record, Watermark};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Value reported for a requested device that has no records yet.
pub const DEFAULT_WATERMARK: &str = "0.0";

#[derive(Debug, Clone)]
pub struct SyncService {
    store: Store,
}

impl SyncService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Persist a batch of records coming from a client.
    pub fn ingest(&self, records: &[Record]) -> AppResult<()> {
        self.store.insert_batch(records)?;
        info!(records = records.len(), "records stored");
        Ok(())
    }

    /// Records the caller is missing, given its per-device watermarks.
    ///
    /// Every entry is parsed before anything is read; if any of them is
    /// malformed the whole request is rejected with all offending devices
    /// listed.
    pub fn delta(&self, watermarks: &HashMap<String, String>) -> AppResult<Vec<Record>> {
        let parsed = parse_watermarks(watermarks)?;
        let records = self.store.scan_newer_than(&parsed)?;
        debug!(
            devices = parsed.len(),
            records = records.len(),
            "history delta computed"
        );
        Ok(records)
    }

    /// Latest timestamp per requested device, `"0.0"` for unknown ones.
    /// An empty request returns every device in the store.
    pub fn watermarks(&self, device_ids: &HashSet<String>) -> AppResult<HashMap<String, String>> {
        let mut latest = self.store.max_timestamp_per_device(device_ids)?;
        for device_id in device_ids {
            latest
                .entry(device_id.clone())
                .or_insert_with(|| DEFAULT_WATERMARK.to_string());
        }
        Ok(latest)
    }
}

/// Parse every watermark string, collecting all failures.
pub fn parse_watermarks(raw: &HashMap<String, String>) -> AppResult<HashMap<String, Watermark>> {
    let mut parsed = HashMap::with_capacity(raw.len());
    let mut invalid = Vec::new();

    for (device_id, value) in raw {
        match value.parse::<Watermark>() {
            Ok(w) => {
                parsed.insert(device_id.clone(), w);
            }
            Err(e) => {
                warn!(device_id = %device_id, value = %value, error = %e, "invalid watermark");
                invalid.push(format!("{device_id}={value}"));
            }
        }
    }

    if invalid.is_empty() {
        Ok(parsed)
    } else {
        invalid.sort();
        Err(AppError::InvalidWatermark(invalid))
    }
}
