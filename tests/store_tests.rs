use resh_sync_sqlite::db::batch::{
    FIELDS_PER_RECORD_HEADROOM, MAX_BOUND_PARAMETERS, RECORD_FIELD_COUNT, records_per_batch,
    records_per_batch_for, sub_batch_count, values_placeholders,
};
use resh_sync_sqlite::db::{Store, StoreOptions, stats};
use resh_sync_sqlite::errors::AppError;
use resh_sync_sqlite::models::{Record, Watermark};
use rusqlite::limits::Limit;
use std::collections::{HashMap, HashSet};

mod common;
use common::{many, rec, sorted_ids, temp_db, temp_store, temp_store_with};

fn full_record() -> Record {
    let mut r = rec("full", "dev-A", "1650000000.1234");
    r.session_id = "sess-42".into();
    r.cmd_line = "git status".into();
    r.exit_code = Some(0);
    r.flags = Some(3);
    r.home = Some("/home/user".into());
    r.pwd = Some("/home/user/src".into());
    r.real_pwd = Some("/mnt/data/src".into());
    r.device = Some("laptop".into());
    r.git_origin_remote = Some("git@example.com:me/repo.git".into());
    r.duration = Some("0.0123".into());
    r.part_one = Some(false);
    r.parts_not_merged = Some(true);
    r.session_exit = Some(false);
    r
}

fn wm(entries: &[(&str, &str)]) -> HashMap<String, Watermark> {
    entries
        .iter()
        .map(|(d, w)| (d.to_string(), w.parse().expect("watermark")))
        .collect()
}

#[test]
fn initialize_is_idempotent() {
    let (_dir, path) = temp_db();

    let first = Store::initialize(&path).expect("first init");
    first.insert_batch(&[rec("r1", "A", "1.0")]).unwrap();

    let second = Store::initialize(&path).expect("second init");
    assert_eq!(second.count().unwrap(), 1);

    let objects: i64 = second
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE tbl_name = 'records'",
                [],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    // table + two explicit indexes + primary key autoindex
    assert_eq!(objects, 4);
}

#[test]
fn initialize_fails_for_unreachable_location() {
    let (dir, _) = temp_db();
    let path = dir.path().join("missing").join("nested").join("db.sqlite");

    let err = Store::initialize(&path).expect_err("directory does not exist");
    assert!(matches!(err, AppError::StoreUnavailable { .. }), "{err}");
}

#[test]
fn stored_record_reads_back_identically() {
    let (_dir, store) = temp_store();
    let original = full_record();

    store.insert_batch(std::slice::from_ref(&original)).unwrap();
    let all = store.scan_newer_than(&HashMap::new()).unwrap();

    assert_eq!(all, vec![original]);
    assert_eq!(all[0].time.to_string(), "1650000000.1234");
}

#[test]
fn unset_optional_fields_stay_unset() {
    let (_dir, store) = temp_store();
    store.insert_batch(&[rec("bare", "A", "10.0")]).unwrap();

    let back = store.scan_newer_than(&HashMap::new()).unwrap().remove(0);
    assert_eq!(back.exit_code, None);
    assert_eq!(back.flags, None);
    assert_eq!(back.home, None);
    assert_eq!(back.part_one, None);
    assert_eq!(back.session_exit, None);

    let nulls: i64 = store
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM records WHERE exitCode IS NULL AND partOne IS NULL",
                [],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    assert_eq!(nulls, 1);
}

#[test]
fn zero_exit_code_is_not_confused_with_unset() {
    let (_dir, store) = temp_store();
    let mut zero = rec("zero", "A", "10.0");
    zero.exit_code = Some(0);
    store.insert_batch(&[zero, rec("unset", "A", "11.0")]).unwrap();

    let by_id: HashMap<String, Record> = store
        .scan_newer_than(&HashMap::new())
        .unwrap()
        .into_iter()
        .map(|r| (r.record_id.clone(), r))
        .collect();
    assert_eq!(by_id["zero"].exit_code, Some(0));
    assert_eq!(by_id["unset"].exit_code, None);
}

#[test]
fn empty_batch_is_a_no_op() {
    let (_dir, store) = temp_store();
    store.insert_batch(&[]).unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn batching_constants_leave_headroom() {
    assert!(FIELDS_PER_RECORD_HEADROOM > RECORD_FIELD_COUNT);
    assert_eq!(records_per_batch(), 49);
    assert!(records_per_batch() * FIELDS_PER_RECORD_HEADROOM <= MAX_BOUND_PARAMETERS);
    assert_eq!(records_per_batch_for(10, 20), 1);
}

#[test]
fn sub_batch_count_matches_ceiling_division() {
    assert_eq!(sub_batch_count(0), 0);
    assert_eq!(sub_batch_count(1), 1);
    assert_eq!(sub_batch_count(49), 1);
    assert_eq!(sub_batch_count(50), 2);
    assert_eq!(sub_batch_count(1000), 21);
    for n in [1usize, 48, 49, 50, 98, 99, 500, 1234] {
        let per = records_per_batch();
        assert_eq!(sub_batch_count(n), n.div_ceil(per));
        assert!(per * RECORD_FIELD_COUNT <= MAX_BOUND_PARAMETERS);
    }
}

#[test]
fn placeholders_bind_one_parameter_per_column() {
    let sql = values_placeholders(3);
    assert_eq!(sql.matches('?').count(), 3 * RECORD_FIELD_COUNT);
    assert_eq!(sql.matches('(').count(), 3);
}

#[test]
fn large_batch_is_split_and_fully_persisted() {
    let (_dir, store) = temp_store();
    // 1000 × 16 parameters is far above the connection's 999-parameter limit.
    let records = many("big", "A", 1000, 1_600_000_000);
    store.insert_batch(&records).unwrap();

    assert_eq!(store.count().unwrap(), 1000);
    assert_eq!(
        sorted_ids(&store.scan_newer_than(&HashMap::new()).unwrap()),
        sorted_ids(&records)
    );
}

#[test]
fn store_connections_enforce_the_bound_parameter_ceiling() {
    let (_dir, store) = temp_store();
    let over = records_per_batch_for(MAX_BOUND_PARAMETERS, RECORD_FIELD_COUNT) + 1;
    assert!(over * RECORD_FIELD_COUNT > MAX_BOUND_PARAMETERS);

    store
        .with_conn(|conn| {
            assert_eq!(
                conn.limit(Limit::SQLITE_LIMIT_VARIABLE_NUMBER).unwrap(),
                MAX_BOUND_PARAMETERS as i32
            );
            let sql = format!("INSERT INTO `records` VALUES {}", values_placeholders(over));
            assert!(conn.prepare(&sql).is_err(), "{over} rows in one statement");
            let sql = format!("INSERT INTO `records` VALUES {}", values_placeholders(over - 1));
            assert!(conn.prepare(&sql).is_ok());
            Ok(())
        })
        .unwrap();
}

#[test]
fn duplicate_record_id_fails_and_keeps_original_row() {
    let (_dir, store) = temp_store();
    store.insert_batch(&[rec("r1", "A", "100.0")]).unwrap();

    let mut clash = rec("r1", "B", "999.0");
    clash.cmd_line = "rm -rf /tmp/x".into();
    let err = store.insert_batch(&[clash]).expect_err("duplicate id");
    assert!(matches!(err, AppError::WriteFailure(_)), "{err}");

    let all = store.scan_newer_than(&HashMap::new()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].device_id, "A");
    assert_eq!(all[0].cmd_line, "echo r1");
    assert_eq!(all[0].time.to_string(), "100.0000");
}

#[test]
fn failing_sub_batch_keeps_earlier_sub_batches_committed() {
    let (_dir, store) = temp_store();
    store.insert_batch(&[rec("taken", "A", "1.0")]).unwrap();

    // First sub-batch is clean, the second one collides.
    let mut records = many("p", "B", 60, 1000);
    records[55].record_id = "taken".into();

    let err = store.insert_batch(&records).expect_err("collision");
    assert!(matches!(err, AppError::WriteFailure(_)));
    assert_eq!(store.count().unwrap(), 1 + records_per_batch() as i64);
}

#[test]
fn atomic_ingest_rolls_back_every_sub_batch() {
    let (_dir, store) = temp_store_with(StoreOptions {
        atomic_ingest: true,
        ..StoreOptions::default()
    });
    store.insert_batch(&[rec("taken", "A", "1.0")]).unwrap();

    let mut records = many("p", "B", 60, 1000);
    records[55].record_id = "taken".into();

    let err = store.insert_batch(&records).expect_err("collision");
    assert!(matches!(err, AppError::WriteFailure(_)));
    assert_eq!(store.count().unwrap(), 1);

    store.insert_batch(&many("ok", "B", 60, 5000)).unwrap();
    assert_eq!(store.count().unwrap(), 61);
}

#[test]
fn max_timestamp_per_device_returns_canonical_latest() {
    let (_dir, store) = temp_store();
    store
        .insert_batch(&[
            rec("a1", "A", "100.0"),
            rec("a2", "A", "200.5"),
            rec("a3", "A", "150.0"),
            rec("b1", "B", "999999999.9"),
            rec("b2", "B", "1000000000.0"),
        ])
        .unwrap();

    let all = store.max_timestamp_per_device(&HashSet::new()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["A"], "200.5000");
    assert_eq!(all["B"], "1000000000.0000");

    let only_a: HashSet<String> = ["A".to_string(), "Z".to_string()].into();
    let filtered = store.max_timestamp_per_device(&only_a).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered["A"], "200.5000");
}

#[test]
fn scan_excludes_records_not_strictly_newer() {
    let (_dir, store) = temp_store();
    store
        .insert_batch(&[
            rec("a1", "A", "100.0"),
            rec("a2", "A", "100.0001"),
            rec("a3", "A", "50.0"),
            rec("b1", "B", "1.0"),
        ])
        .unwrap();

    let out = store.scan_newer_than(&wm(&[("A", "100.0000")])).unwrap();
    assert_eq!(sorted_ids(&out), vec!["a2", "b1"]);

    for r in out.iter().filter(|r| r.device_id == "A") {
        assert!(r.time.ticks() > "100.0".parse::<Watermark>().unwrap().ticks());
    }
}

#[test]
fn scan_returns_unlisted_devices_regardless_of_age() {
    let (_dir, store) = temp_store();
    store
        .insert_batch(&[rec("old", "B", "1.0"), rec("a", "A", "10.0")])
        .unwrap();

    let out = store.scan_newer_than(&wm(&[("A", "999.0")])).unwrap();
    assert_eq!(sorted_ids(&out), vec!["old"]);
}

#[test]
fn zero_watermark_returns_whole_device() {
    let (_dir, store) = temp_store();
    store.insert_batch(&many("a", "A", 5, 1)).unwrap();

    let out = store.scan_newer_than(&wm(&[("A", "0.0")])).unwrap();
    assert_eq!(out.len(), 5);
}

#[test]
fn stats_summarize_the_store() {
    let (_dir, store) = temp_store();
    let empty = stats::collect(&store).unwrap();
    assert_eq!(empty.records, 0);
    assert_eq!(empty.first, None);

    store
        .insert_batch(&[rec("a", "A", "10.0"), rec("b", "B", "20.25")])
        .unwrap();
    let s = stats::collect(&store).unwrap();
    assert_eq!(s.records, 2);
    assert_eq!(s.devices, 2);
    assert_eq!(s.first.as_deref(), Some("10.0000"));
    assert_eq!(s.last.as_deref(), Some("20.2500"));
}

#[test]
fn concurrent_writers_and_readers_share_one_store() {
    let (_dir, store) = temp_store();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            std::thread::spawn(move || {
                let device = format!("dev-{t}");
                for chunk in 0..5 {
                    let records = many(&format!("{device}-{chunk}"), &device, 20, 1000 * chunk);
                    store.insert_batch(&records).unwrap();
                    store.scan_newer_than(&HashMap::new()).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.count().unwrap(), 4 * 5 * 20);
}
