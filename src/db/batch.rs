//! Sub-batch sizing for multi-row INSERTs.

/// Bound parameters SQLite accepts per statement on conservative builds
/// (`SQLITE_MAX_VARIABLE_NUMBER` before 3.32).
pub const MAX_BOUND_PARAMETERS: usize = 999;

/// Columns actually bound per record in `records`.
pub const RECORD_FIELD_COUNT: usize = 16;

/// Per-record multiplier used for sizing sub-batches. Intentionally larger
/// than [`RECORD_FIELD_COUNT`] to leave headroom for new columns.
pub const FIELDS_PER_RECORD_HEADROOM: usize = 20;

/// Records per sub-batch under the parameter ceiling.
pub const fn records_per_batch() -> usize {
    records_per_batch_for(MAX_BOUND_PARAMETERS, FIELDS_PER_RECORD_HEADROOM)
}

/// Records per sub-batch for an arbitrary ceiling. Never below one.
pub const fn records_per_batch_for(max_parameters: usize, fields_per_record: usize) -> usize {
    let n = max_parameters / fields_per_record;
    if n == 0 { 1 } else { n }
}

/// Number of sub-batches needed for `records` rows.
pub fn sub_batch_count(records: usize) -> usize {
    records.div_ceil(records_per_batch())
}

/// `(?, ?, …), (?, ?, …)` for `rows` rows of `RECORD_FIELD_COUNT` columns.
pub fn values_placeholders(rows: usize) -> String {
    let row = format!("({})", vec!["?"; RECORD_FIELD_COUNT].join(", "));
    vec![row; rows].join(", ")
}
