//! Store round-trip: what the pipeline wrote, the validation tools
//! must read back unchanged — dates, optional fields, and booleans
//! included.

use snowtwin_core::{config::GenConfig, pipeline::Pipeline, store::TableStore};
use std::path::PathBuf;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("snowtwin-{label}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("clear scratch dir");
    }
    dir
}

#[test]
fn bundle_round_trips_through_csv() {
    let mut cfg = GenConfig::default();
    cfg.zones = 150;
    cfg.total_customers = 200;
    let bundle = Pipeline::new(cfg, 42).run().expect("run");

    let dir = scratch_dir("roundtrip");
    let store = TableStore::new(&dir);
    store.write_bundle(&bundle, 42, None).expect("write");

    let loaded = store.load_bundle().expect("load");
    assert_eq!(bundle, loaded, "bundle changed across the CSV round trip");

    let manifest = store.read_manifest().expect("manifest");
    assert_eq!(manifest.seed, 42);
    assert_eq!(manifest.customers, bundle.customers.len());
    assert_eq!(manifest.usage_records, bundle.usage.len());

    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn streamed_usage_matches_materialized_usage_on_disk() {
    let mut cfg = GenConfig::default();
    cfg.zones = 150;
    cfg.total_customers = 100;
    let bundle = Pipeline::new(cfg, 7).run().expect("run");

    let dir = scratch_dir("stream");
    let store = TableStore::new(&dir);

    let mut writer = store.usage_writer().expect("writer");
    for record in &bundle.usage {
        writer.append(record).expect("append");
    }
    let rows = writer.finish().expect("finish");
    assert_eq!(rows, bundle.usage.len());

    let loaded = store.load_usage().expect("load");
    assert_eq!(loaded, bundle.usage);

    std::fs::remove_dir_all(&dir).expect("cleanup");
}
