use crate::db::pool::Store;
use crate::errors::{AppError, AppResult};
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time;
use std::fs;

/// Summary of what the store currently holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub records: i64,
    pub devices: i64,
    pub first: Option<String>,
    pub last: Option<String>,
}

pub fn collect(store: &Store) -> AppResult<StoreStats> {
    let conn = store.connect()?;

    let (records, devices): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COUNT(DISTINCT `deviceId`) FROM `records`",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(AppError::ReadFailure)?;

    let (first, last): (Option<String>, Option<String>) = conn
        .query_row("SELECT MIN(`time`), MAX(`time`) FROM `records`", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(AppError::ReadFailure)?;

    let wire = |v: Option<String>| -> AppResult<Option<String>> {
        v.map(|t| time::parse_engine(&t).map(|i| time::encode(&i)))
            .transpose()
    };

    Ok(StoreStats {
        records,
        devices,
        first: wire(first)?,
        last: wire(last)?,
    })
}

pub fn print_db_info(store: &Store) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(store.location()).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!(
        "{}• File:{} {}{}{}",
        CYAN,
        RESET,
        YELLOW,
        store.location().display(),
        RESET
    );
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    let stats = collect(store)?;
    println!(
        "{}• Total records:{} {}{}{}",
        CYAN, RESET, GREEN, stats.records, RESET
    );
    println!(
        "{}• Devices:{} {}{}{}",
        CYAN, RESET, GREEN, stats.devices, RESET
    );

    //
    // 3) TIME RANGE
    //
    let fmt = |v: Option<String>| v.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Time range:{}", CYAN, RESET);
    println!("    from: {}", fmt(stats.first));
    println!("    to:   {}", fmt(stats.last));

    println!();
    Ok(())
}
