use std::sync::Arc;

use cf_core::{ManualClock, in_seconds};
use cf_fill::*;
use cf_storage::{KeyValueStore, MemoryStore};
use proptest::prelude::*;

fn fresh(storage: &Arc<MemoryStore>, clock: &Arc<ManualClock>) -> FillStore {
    FillStore::new(storage.clone(), clock.clone())
}

#[test]
fn write_reset_load_round_trip_while_filling() {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_652_696_982.0));
    let mut store = fresh(&storage, &clock);

    store.set_fill_parameters(&PartialFillParameters {
        cylinder_size: Some(15.0),
        starting_pressure: Some(35.0),
        target_pressure: Some(200.0),
        ..Default::default()
    });
    store.set_fill_rate_from_log(101.5);
    store.start_filling().unwrap();
    let before = store.state().clone();

    store.write_to_storage().unwrap();
    store.reset_store();
    assert_ne!(store.state(), &before);

    assert!(store.load_from_storage().unwrap());
    assert_eq!(store.state(), &before);
}

#[test]
fn round_trip_keeps_cleared_fields_cleared() {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = fresh(&storage, &clock);

    store.clear_fill_parameter(FillField::CylinderSize);
    let before = store.state().clone();
    store.write_to_storage().unwrap();
    store.reset_store();
    store.load_from_storage().unwrap();
    assert_eq!(store.state(), &before);
    assert_eq!(store.state().cylinder_size, None);
}

#[test]
fn a_new_process_resumes_the_running_fill() {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(10_000.0));

    let mut first = fresh(&storage, &clock);
    first.set_fill_parameters(&PartialFillParameters {
        starting_pressure: Some(100.0),
        ..Default::default()
    });
    first.start_filling().unwrap();
    drop(first);

    let mut second = fresh(&storage, &clock);
    assert!(!second.is_filling());
    second.load_from_storage().unwrap();
    assert!(second.is_filling());
    assert_eq!(second.state().start_time, Some(10_000.0));
}

#[test]
fn loading_nothing_keeps_defaults() {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = fresh(&storage, &clock);
    assert!(!store.load_from_storage().unwrap());
    assert_eq!(store.state(), &FillSessionState::default());
}

#[test]
fn unknown_stored_keys_are_ignored() {
    let storage = Arc::new(MemoryStore::new());
    storage
        .set(
            "cylfill-1",
            r#"{"fillRate": 95, "legacyUnits": "psi", "cylinderSize": 7}"#,
        )
        .unwrap();
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = fresh(&storage, &clock);

    assert!(store.load_from_storage().unwrap());
    assert_eq!(store.state().fill_rate, Some(95.0));
    assert_eq!(store.state().cylinder_size, Some(7.0));
    assert_eq!(store.state().target_pressure, Some(232.0));
}

#[test]
fn malformed_storage_falls_back_to_current_state() {
    let storage = Arc::new(MemoryStore::new());
    storage.set("cylfill-1", "{not json").unwrap();
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = fresh(&storage, &clock);

    assert!(!store.load_from_storage().unwrap());
    assert_eq!(store.state(), &FillSessionState::default());
}

#[test]
fn other_versions_are_not_read() {
    let storage = Arc::new(MemoryStore::new());
    storage.set("cylfill-0", r#"{"fillRate": 1}"#).unwrap();
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = fresh(&storage, &clock);

    assert!(!store.load_from_storage().unwrap());
    assert_eq!(store.state().fill_rate, Some(110.0));
}

#[test]
fn configured_defaults_apply_on_reset() {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let defaults = SessionDefaults {
        cylinder_size_l: Some(15.0),
        fill_rate_lpm: Some(140.0),
        target_pressure_bar: Some(300.0),
    };
    let mut store = FillStore::with_defaults(storage, clock, defaults);
    store.set_fill_parameters(&PartialFillParameters {
        cylinder_size: Some(7.0),
        ..Default::default()
    });
    store.reset_store();
    assert_eq!(store.state().cylinder_size, Some(15.0));
    assert_eq!(store.state().fill_rate, Some(140.0));
    assert_eq!(store.state().target_pressure, Some(300.0));
}

proptest! {
    #[test]
    fn remaining_time_never_increases(
        start_pressure in 0.0_f64..232.0,
        mut offsets in prop::collection::vec(-100.0_f64..10_000.0, 2..20),
    ) {
        let storage = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000_000.0));
        let mut store = fresh(&storage, &clock);
        store.set_fill_parameters(&PartialFillParameters {
            starting_pressure: Some(start_pressure),
            ..Default::default()
        });
        store.start_filling().unwrap();

        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let remaining: Vec<f64> = offsets
            .iter()
            .map(|dt| in_seconds(store.get_fill_time_remaining(1_000_000.0 + dt).unwrap()))
            .collect();
        for pair in remaining.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
        prop_assert!(remaining.iter().all(|r| *r >= 0.0));
    }
}
