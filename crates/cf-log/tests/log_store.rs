use std::sync::Arc;

use cf_core::{EntryId, ReportZone};
use cf_log::*;
use cf_storage::{KeyValueStore, MemoryStore};
use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

const ONE_DAY: f64 = 24.0 * 60.0 * 60.0;

fn bst() -> ReportZone {
    ReportZone::east_hours(1).unwrap()
}

fn new_store() -> (LogStore, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    (LogStore::new(storage.clone(), bst()), storage)
}

fn fill(start_time: f64, end_time: f64) -> NewLogEntry {
    NewLogEntry {
        cylinder_size: 12.0,
        starting_pressure: 50.0,
        target_pressure: 230.0,
        start_time,
        end_time,
    }
}

fn add_fill(store: &mut LogStore, start_time: f64, end_time: f64) -> LogEntry {
    store.add_log_entry(fill(start_time, end_time)).unwrap()
}

#[test]
fn stores_a_log_entry() {
    let (mut store, storage) = new_store();
    assert_eq!(store.number_of_log_entries(), 0);

    let entry = store
        .add_log_entry(NewLogEntry {
            cylinder_size: 12.0,
            starting_pressure: 50.0,
            target_pressure: 232.0,
            start_time: 1_652_696_982.0,
            end_time: 1_652_698_182.0,
        })
        .unwrap();

    assert_eq!(store.number_of_log_entries(), 1);
    assert_eq!(
        store.state().log_entries,
        vec![LogEntry {
            id: entry.id,
            cylinder_size: 12.0,
            starting_pressure: 50.0,
            target_pressure: 232.0,
            start_time: 1_652_696_982.0,
            end_time: 1_652_698_182.0,
        }]
    );
    assert!(storage.get("cylfill-log-1").unwrap().is_some());
}

#[test]
fn counts_entries() {
    let (mut store, _) = new_store();
    for n in 1..=5 {
        add_fill(&mut store, 0.0, 1200.0);
        assert_eq!(store.number_of_log_entries(), n);
    }
}

#[test]
fn ids_are_unique() {
    let (mut store, _) = new_store();
    let a = add_fill(&mut store, 0.0, 1200.0);
    let b = add_fill(&mut store, 0.0, 1200.0);
    assert_ne!(a.id, b.id);
}

#[test]
fn deletes_log_entries() {
    let (mut store, _) = new_store();
    let first = add_fill(&mut store, 0.0, 1200.0);
    let second = add_fill(&mut store, 0.0, 1200.0);
    assert_eq!(store.number_of_log_entries(), 2);

    assert!(store.delete_log_entry(&first.id).unwrap());
    assert_eq!(store.number_of_log_entries(), 1);
    assert_eq!(store.state().log_entries[0].id, second.id);

    let after_once = store.state().clone();
    assert!(!store.delete_log_entry(&first.id).unwrap());
    assert_eq!(store.state(), &after_once);

    store.delete_log_entry(&second.id).unwrap();
    assert_eq!(store.number_of_log_entries(), 0);
}

#[test]
fn deleting_unknown_id_is_a_no_op() {
    let (mut store, _) = new_store();
    add_fill(&mut store, 0.0, 1200.0);
    assert!(!store.delete_log_entry(&EntryId::generate()).unwrap());
    assert_eq!(store.number_of_log_entries(), 1);
}

#[test]
fn has_logs() {
    let (mut store, _) = new_store();
    assert!(!store.has_logs());
    let entry = add_fill(&mut store, 0.0, 1200.0);
    assert!(store.has_logs());
    store.delete_log_entry(&entry.id).unwrap();
    assert!(!store.has_logs());
}

#[test]
fn round_trip_when_empty() {
    let (mut store, _) = new_store();
    store.write_to_storage().unwrap();
    store.reset_store();
    store.load_from_storage().unwrap();
    assert_eq!(store.number_of_log_entries(), 0);
}

#[test]
fn round_trip_with_logs() {
    let (mut store, _) = new_store();
    add_fill(&mut store, 1_000.0, 2_200.0);
    add_fill(&mut store, 5_000.0, 6_080.5);
    let before = store.state().clone();

    store.write_to_storage().unwrap();
    store.reset_store();
    assert_eq!(store.number_of_log_entries(), 0);

    assert!(store.load_from_storage().unwrap());
    assert_eq!(store.state(), &before);
}

#[test]
fn stored_layout_is_stable() {
    let (mut store, storage) = new_store();
    let entry = add_fill(&mut store, 0.0, 1200.0);
    let raw = storage.get("cylfill-log-1").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "logEntries": [{
                "id": entry.id.to_string(),
                "cylinderSize": 12.0,
                "startingPressure": 50.0,
                "targetPressure": 230.0,
                "startTime": 0.0,
                "endTime": 1200.0,
            }]
        })
    );
}

#[test]
fn unreadable_storage_is_ignored() {
    for raw in ["[[[", r#"{"logEntries": 3}"#, "[]"] {
        let storage = Arc::new(MemoryStore::new());
        storage.set("cylfill-log-1", raw).unwrap();
        let mut store = LogStore::new(storage, bst());
        assert!(!store.load_from_storage().unwrap(), "{raw}");
        assert_eq!(store.number_of_log_entries(), 0);
    }
}

#[test]
fn stored_duplicate_ids_are_dropped() {
    let id = EntryId::generate();
    let raw = format!(
        r#"{{"logEntries":[
            {{"id":"{id}","cylinderSize":12,"startingPressure":50,"targetPressure":230,"startTime":0,"endTime":1200}},
            {{"id":"{id}","cylinderSize":15,"startingPressure":40,"targetPressure":232,"startTime":5000,"endTime":6000}}
        ]}}"#
    );
    let storage = Arc::new(MemoryStore::new());
    storage.set("cylfill-log-1", &raw).unwrap();

    let mut store = LogStore::new(storage, bst());
    assert!(store.load_from_storage().unwrap());
    assert_eq!(store.number_of_log_entries(), 1);
    assert_eq!(store.state().log_entries[0].cylinder_size, 12.0);
    assert!(store.contains(&id));
}

#[test]
fn non_finite_entries_are_rejected() {
    let (mut store, storage) = new_store();
    let err = store.add_log_entry(fill(0.0, f64::NAN)).unwrap_err();
    assert!(matches!(err, LogError::InvalidEntry { .. }));
    assert_eq!(store.number_of_log_entries(), 0);
    assert!(storage.is_empty());
}

#[test]
fn enhanced_logs_are_newest_first() {
    let (mut store, _) = new_store();
    assert!(store.get_logs().is_empty());

    let older = add_fill(&mut store, 10_000.0, 11_200.0);
    let newer = add_fill(&mut store, 20_000.0, 21_080.0);

    let logs = store.get_logs();
    assert_eq!(logs.len(), 2);
    assert_eq!(
        logs[0],
        LogEntryEnhanced {
            entry: newer,
            duration: 1080.0,
            fill_rate: 120.0,
        }
    );
    assert_eq!(
        logs[1],
        LogEntryEnhanced {
            entry: older,
            duration: 1200.0,
            fill_rate: 108.0,
        }
    );
}

#[test]
fn empty_log_stats() {
    let (store, _) = new_store();
    assert_eq!(
        store.get_log_stats(1_700_000_000.0).unwrap(),
        LogStats {
            log_count: 0,
            fill_rate_today: None,
            fill_rate_all: None,
        }
    );
}

#[test]
fn duplicate_entries_give_same_stats() {
    let (mut store, _) = new_store();
    let now = 1_700_000_000.0;
    add_fill(&mut store, now - 1200.0, now);
    let one = store.get_log_stats(now).unwrap();
    assert_eq!(one.fill_rate_today, Some(108.0));
    assert_eq!(one.fill_rate_all, Some(108.0));

    for _ in 0..3 {
        add_fill(&mut store, now - 1200.0, now);
    }
    let four = store.get_log_stats(now).unwrap();
    assert_eq!(four.log_count, 4);
    assert_eq!(four.fill_rate_today, Some(108.0));
    assert_eq!(four.fill_rate_all, Some(108.0));
}

#[test]
fn combines_entries_from_the_same_day() {
    let (mut store, _) = new_store();
    let now = Utc
        .with_ymd_and_hms(2022, 5, 17, 0, 15, 0)
        .unwrap()
        .timestamp() as f64;
    add_fill(&mut store, now - 20.0 * 60.0, now);
    add_fill(&mut store, now - 18.0 * 60.0, now);

    assert_eq!(
        store.get_log_stats(now).unwrap(),
        LogStats {
            log_count: 2,
            fill_rate_today: Some(114.0),
            fill_rate_all: Some(114.0),
        }
    );
}

#[test]
fn nothing_today() {
    let (mut store, _) = new_store();
    let now = Utc
        .with_ymd_and_hms(2022, 5, 17, 0, 15, 0)
        .unwrap()
        .timestamp() as f64;
    let yesterday = now - ONE_DAY;
    add_fill(&mut store, yesterday - 20.0 * 60.0, yesterday);

    assert_eq!(
        store.get_log_stats(now).unwrap(),
        LogStats {
            log_count: 1,
            fill_rate_today: None,
            fill_rate_all: Some(108.0),
        }
    );
}

#[test]
fn today_and_all_time() {
    let (mut store, _) = new_store();
    let now = Utc
        .with_ymd_and_hms(2022, 5, 17, 0, 15, 0)
        .unwrap()
        .timestamp() as f64;
    let yesterday = now - ONE_DAY;
    add_fill(&mut store, yesterday - 20.0 * 60.0, yesterday);
    add_fill(&mut store, now - 18.0 * 60.0, now);

    assert_eq!(
        store.get_log_stats(now).unwrap(),
        LogStats {
            log_count: 2,
            fill_rate_today: Some(120.0),
            fill_rate_all: Some(114.0),
        }
    );
}

#[test]
fn blank_export() {
    let (store, _) = new_store();
    assert_eq!(store.get_export_text().unwrap(), EXPORT_HEADER);
    assert_eq!(
        EXPORT_HEADER,
        "ID,Start Time,End Time,Cylinder Size (L),Starting Pressure (bar),Target Pressure (bar),Duration (seconds),Fill Rate (L/min)"
    );
}

#[test]
fn export_with_data() {
    let (mut store, _) = new_store();
    let now = 1_500_000_000.0;
    let first = add_fill(&mut store, now - ONE_DAY - 20.0 * 60.0, now - ONE_DAY);
    let second = add_fill(&mut store, now - 18.0 * 60.0, now);

    let text = store.get_export_text().unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], EXPORT_HEADER);
    assert_eq!(
        lines[1],
        format!(
            "{},2017-07-14 03:22:00,2017-07-14 03:40:00,12,50,230,1080.0,120.00",
            second.id
        )
    );
    assert_eq!(
        lines[2],
        format!(
            "{},2017-07-13 03:20:00,2017-07-13 03:40:00,12,50,230,1200.0,108.00",
            first.id
        )
    );
}

#[test]
fn export_rounds_ties_up() {
    let (mut store, _) = new_store();
    let quarter_second = add_fill(&mut store, 0.0, 1234.25);
    let exact_rate = store
        .add_log_entry(NewLogEntry {
            cylinder_size: 1.0,
            starting_pressure: 0.0,
            target_pressure: 108.125,
            start_time: 100.0,
            end_time: 160.0,
        })
        .unwrap();

    let text = store.get_export_text().unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(
        lines[1],
        format!(
            "{},1970-01-01 01:01:40,1970-01-01 01:02:40,1,0,108.125,60.0,108.13",
            exact_rate.id
        )
    );
    assert_eq!(
        lines[2],
        format!(
            "{},1970-01-01 01:00:00,1970-01-01 01:20:34,12,50,230,1234.3,105.00",
            quarter_second.id
        )
    );
}

#[test]
fn fake_entries_look_like_real_fills() {
    let (mut store, _) = new_store();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let entry = generate_fake_log_entry(&mut store, &mut rng).unwrap();
        assert!([7.0, 12.0, 15.0, 24.0].contains(&entry.cylinder_size));
        assert!((20.0..=150.0).contains(&entry.starting_pressure));
        assert_eq!(entry.target_pressure, 232.0);
        assert_eq!(entry.start_time, 0.0);
        assert!(entry.end_time > 0.0);

        let rate = entry.fill_rate();
        assert!((89.9..=150.1).contains(&rate), "{rate}");
    }
    assert_eq!(store.number_of_log_entries(), 50);
}
