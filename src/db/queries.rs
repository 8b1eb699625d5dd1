use crate::db::batch::{RECORD_FIELD_COUNT, records_per_batch, values_placeholders};
use crate::db::pool::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Record, Watermark};
use crate::utils::time::{self, Timestamp};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row, TransactionBehavior};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const INSERT_PREFIX: &str = "INSERT INTO `records` (`recordId`, `deviceId`, `sessionId`, `cmdLine`, \
     `exitCode`, `time`, `flags`, `home`, `pwd`, `realPwd`, `device`, `gitOriginRemote`, \
     `duration`, `partOne`, `partsNotMerged`, `sessionExit`) VALUES ";

const SELECT_ALL: &str = "SELECT `recordId`, `deviceId`, `sessionId`, `cmdLine`, `exitCode`, \
     `time`, `flags`, `home`, `pwd`, `realPwd`, `device`, `gitOriginRemote`, `duration`, \
     `partOne`, `partsNotMerged`, `sessionExit` FROM `records`";

const LATEST_PER_DEVICE: &str =
    "SELECT `deviceId`, MAX(`time`) FROM `records` GROUP BY `deviceId`";

impl Store {
    /// Persist `records` as new rows, split into sub-batches that stay
    /// under the bound-parameter ceiling.
    ///
    /// Without `atomic_ingest`, sub-batches committed before a failing one
    /// stay committed.
    pub fn insert_batch(&self, records: &[Record]) -> AppResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut conn = self.connect()?;

        if self.options().atomic_ingest {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(AppError::WriteFailure)?;
            insert_chunks(&tx, records)?;
            tx.commit().map_err(AppError::WriteFailure)?;
        } else {
            insert_chunks(&conn, records)?;
        }
        Ok(())
    }

    /// Latest canonical timestamp per device, restricted to `devices` when
    /// it is non-empty. Devices without rows are absent.
    pub fn max_timestamp_per_device(
        &self,
        devices: &HashSet<String>,
    ) -> AppResult<HashMap<String, String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(LATEST_PER_DEVICE).map_err(AppError::ReadFailure)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })
            .map_err(AppError::ReadFailure)?;

        let mut latest = HashMap::new();
        for row in rows {
            let (device_id, max_time) = row.map_err(AppError::ReadFailure)?;
            if !devices.is_empty() && !devices.contains(&device_id) {
                continue;
            }
            let Some(max_time) = max_time else { continue };
            let instant = time::parse_engine(&max_time)
                .map_err(|e| AppError::ReadFailure(conversion_failure(1, e)))?;
            latest.insert(device_id, time::encode(&instant));
        }
        Ok(latest)
    }

    /// Every record, minus those of watermarked devices that are not
    /// strictly newer than their device's watermark.
    pub fn scan_newer_than(
        &self,
        watermarks: &HashMap<String, Watermark>,
    ) -> AppResult<Vec<Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_ALL).map_err(AppError::ReadFailure)?;
        let rows = stmt.query_map([], map_row).map_err(AppError::ReadFailure)?;

        let mut out = Vec::new();
        for row in rows {
            let record = row.map_err(AppError::ReadFailure)?;
            if let Some(watermark) = watermarks.get(&record.device_id)
                && !watermark.admits(&record.time)
            {
                continue;
            }
            out.push(record);
        }
        Ok(out)
    }

    /// Total rows in `records`.
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.connect()?;
        conn.query_row("SELECT COUNT(*) FROM `records`", [], |row| row.get(0))
            .map_err(AppError::ReadFailure)
    }
}

fn insert_chunks(conn: &Connection, records: &[Record]) -> AppResult<()> {
    for (index, chunk) in records.chunks(records_per_batch()).enumerate() {
        let sql = format!("{INSERT_PREFIX}{}", values_placeholders(chunk.len()));
        let times: Vec<String> = chunk
            .iter()
            .map(|r| time::format_engine(&r.time.instant()))
            .collect();

        let mut values: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * RECORD_FIELD_COUNT);
        for (r, t) in chunk.iter().zip(&times) {
            let row: [&dyn ToSql; RECORD_FIELD_COUNT] = [
                &r.record_id,
                &r.device_id,
                &r.session_id,
                &r.cmd_line,
                &r.exit_code,
                t,
                &r.flags,
                &r.home,
                &r.pwd,
                &r.real_pwd,
                &r.device,
                &r.git_origin_remote,
                &r.duration,
                &r.part_one,
                &r.parts_not_merged,
                &r.session_exit,
            ];
            values.extend_from_slice(&row);
        }

        let mut stmt = conn.prepare(&sql).map_err(AppError::WriteFailure)?;
        stmt.execute(values.as_slice())
            .map_err(AppError::WriteFailure)?;
        debug!(sub_batch = index, rows = chunk.len(), "sub-batch written");
    }
    Ok(())
}

/// Map a `records` row (column order of `SELECT_ALL`) to a [`Record`].
pub fn map_row(row: &Row) -> rusqlite::Result<Record> {
    let time_str: String = row.get(5)?;
    let instant = time::parse_engine(&time_str).map_err(|e| conversion_failure(5, e))?;

    Ok(Record {
        record_id: row.get(0)?,
        device_id: row.get(1)?,
        session_id: row.get(2)?,
        cmd_line: row.get(3)?,
        exit_code: row.get(4)?,
        time: Timestamp::new(instant),
        flags: row.get(6)?,
        home: row.get(7)?,
        pwd: row.get(8)?,
        real_pwd: row.get(9)?,
        device: row.get(10)?,
        git_origin_remote: row.get(11)?,
        duration: row.get(12)?,
        part_one: row.get(13)?,
        parts_not_merged: row.get(14)?,
        session_exit: row.get(15)?,
    })
}

fn conversion_failure(column: usize, e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}
