//! SQLite sink round trips.

use orderops_core::{
    config::GenConfig,
    engine::DatasetEngine,
    export::DatasetSink,
    store::SqliteStore,
};

fn store() -> SqliteStore {
    let store = SqliteStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn persists_all_four_tables() {
    let dataset = DatasetEngine::new(GenConfig::default_test())
        .unwrap()
        .generate()
        .unwrap();
    let mut store = store();
    store.write(&dataset).unwrap();

    let run_id = dataset.run_id.as_str();
    assert_eq!(store.client_count(run_id).unwrap(), 50);
    assert_eq!(store.order_count(run_id).unwrap(), 500);
    assert_eq!(store.communication_count(run_id).unwrap(), 500);
    assert_eq!(store.fact_count(run_id).unwrap(), 500);
    assert_eq!(store.run_seed(run_id).unwrap(), Some(42));

    let late = dataset.facts.iter().filter(|f| f.is_late == 1).count() as i64;
    assert_eq!(store.late_count(run_id).unwrap(), late);

    for (status, _) in store.delivered_count_by_status(run_id).unwrap() {
        assert!(status == "Delivered" || status == "Returned", "{status} has a delivery");
    }
}

#[test]
fn rewriting_a_run_replaces_its_rows() {
    let engine = DatasetEngine::new(GenConfig::default_test()).unwrap();
    let dataset = engine.generate().unwrap();
    let mut store = store();
    store.write(&dataset).unwrap();
    store.write(&dataset).unwrap();
    assert_eq!(store.order_count(&dataset.run_id).unwrap(), 500);
}

#[test]
fn runs_with_different_seeds_coexist() {
    let mut store = store();
    for seed in [1u64, 2] {
        let dataset = DatasetEngine::new(GenConfig {
            seed,
            ..GenConfig::default_test()
        })
        .unwrap()
        .generate()
        .unwrap();
        store.write(&dataset).unwrap();
    }
    assert_eq!(store.order_count("run-1").unwrap(), 500);
    assert_eq!(store.order_count("run-2").unwrap(), 500);
    assert_eq!(store.run_seed("run-3").unwrap(), None);
}

#[test]
fn registered_run_is_upserted_and_reused_by_the_sink() {
    let mut store = store();
    store.insert_run("run-42", 7, "0.0.0").unwrap();
    assert_eq!(store.run_seed("run-42").unwrap(), Some(7));

    store.insert_run("run-42", 42, "0.0.0").unwrap();
    assert_eq!(store.run_seed("run-42").unwrap(), Some(42));

    let dataset = DatasetEngine::new(GenConfig::default_test())
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(dataset.run_id, "run-42");
    store.write(&dataset).unwrap();
    assert_eq!(store.run_seed("run-42").unwrap(), Some(42));
    assert_eq!(store.client_count("run-42").unwrap(), 50);
}
