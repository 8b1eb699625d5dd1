use super::batch::MAX_BOUND_PARAMETERS;
use rusqlite::limits::Limit;
use rusqlite::{Connection, Result};
use std::time::Duration;

/// Create the `records` table and its indexes if they are missing.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS `records` (
            `recordId`        VARCHAR(255) NOT NULL PRIMARY KEY,
            `deviceId`        VARCHAR(255) NOT NULL,
            `sessionId`       VARCHAR(255) NOT NULL,
            `cmdLine`         TEXT NOT NULL,
            `exitCode`        INT,
            `time`            DATETIME,
            `flags`           INT,
            `home`            TEXT,
            `pwd`             TEXT,
            `realPwd`         TEXT,
            `device`          TEXT,
            `gitOriginRemote` TEXT,
            `duration`        TEXT,
            `partOne`         BOOL,
            `partsNotMerged`  BOOL,
            `sessionExit`     BOOL
        );

        CREATE INDEX IF NOT EXISTS `deviceId` ON `records` (`deviceId`);
        CREATE INDEX IF NOT EXISTS `time` ON `records` (`time`);
        "#,
    )?;
    Ok(())
}

/// Per-connection settings. WAL lets readers proceed while a writer commits.
/// The bound-parameter limit is pinned to the ceiling sub-batches are sized for.
pub fn apply_pragmas(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.set_limit(Limit::SQLITE_LIMIT_VARIABLE_NUMBER, MAX_BOUND_PARAMETERS as i32)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )?;
    Ok(())
}
