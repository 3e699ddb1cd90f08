use std::collections::HashSet;
use std::fs;

use super::Catalog;
use crate::layout::Layout;
use crate::record::{ClipRecord, RecordState};

fn manifest(n: u64) -> Vec<ClipRecord> {
    (0..n)
        .map(|i| {
            ClipRecord::new(
                i,
                format!("vid{}", i),
                format!("https://example.com/v/vid{}", i),
                0,
                "rain",
                "train",
            )
        })
        .collect()
}

fn layout(tmp: &tempfile::TempDir) -> Layout {
    Layout::new(tmp.path().join("raw"), tmp.path().join("clips"))
}

#[test]
fn persist_then_load_reproduces_flags() {
    let tmp = tempfile::tempdir().unwrap();
    let mut records = manifest(4);
    records[0].downloaded = true;
    records[0].processed = true;
    records[1].downloaded = true;
    records[2].unavailable = true;

    let catalog = Catalog::build(records, &HashSet::new(), &layout(&tmp));
    let store = tmp.path().join("meta/records.json");
    catalog.persist(&store).unwrap();

    let reloaded = Catalog::load(&store).unwrap().expect("store exists");
    assert_eq!(reloaded.records(), catalog.records());
}

#[test]
fn load_returns_none_without_store() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(Catalog::load(&tmp.path().join("missing.json"))
        .unwrap()
        .is_none());
}

#[test]
fn ingestion_excludes_known_unavailable_but_keeps_indices() {
    let tmp = tempfile::tempdir().unwrap();
    let excluded: HashSet<String> = ["vid1".to_string()].into();
    let catalog = Catalog::build(manifest(3), &excluded, &layout(&tmp));
    assert_eq!(catalog.len(), 2);
    // Indices come from manifest row position, not from the surviving set.
    let indices: Vec<u64> = catalog.records().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn cold_build_reconciles_existing_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = layout(&tmp);
    let records = manifest(3);

    // Record 0 already has its final clip; record 1 only the raw download.
    layout.ensure_dirs(&records[0]).unwrap();
    fs::write(layout.final_path(&records[0]), b"clip").unwrap();
    fs::write(layout.raw_path(&records[1]), b"raw").unwrap();

    let catalog = Catalog::build(records, &HashSet::new(), &layout);
    assert_eq!(catalog.records()[0].state(), RecordState::Done);
    assert_eq!(catalog.records()[1].state(), RecordState::DownloadedOnly);
    assert_eq!(catalog.records()[2].state(), RecordState::Pending);

    // Records classified Done at startup never enter the pending set.
    let slots: Vec<usize> = catalog.pending_work().iter().map(|(s, _)| *s).collect();
    assert_eq!(slots, vec![1, 2]);
}

#[test]
fn loaded_store_is_authoritative_over_filesystem() {
    let tmp = tempfile::tempdir().unwrap();
    let lay = layout(&tmp);

    // Persisted store says record 7 is done, though no files exist on disk.
    let mut records = manifest(8);
    records[7].downloaded = true;
    records[7].processed = true;
    let store = tmp.path().join("records.json");
    Catalog::build(records, &HashSet::new(), &lay)
        .persist(&store)
        .unwrap();

    let reloaded = Catalog::load(&store).unwrap().unwrap();
    assert_eq!(reloaded.records()[7].state(), RecordState::Done);
    assert!(reloaded
        .pending_work()
        .iter()
        .all(|(_, r)| r.index != 7));
}

#[test]
fn pending_work_excludes_terminal_states() {
    let tmp = tempfile::tempdir().unwrap();
    let mut records = manifest(4);
    records[0].unavailable = true;
    records[1].downloaded = true;
    records[1].processed = true;
    records[2].downloaded = true; // downloaded-only: still eligible

    let catalog = Catalog::build(records, &HashSet::new(), &layout(&tmp));
    let slots: Vec<usize> = catalog.pending_work().iter().map(|(s, _)| *s).collect();
    assert_eq!(slots, vec![2, 3]);
}

#[test]
fn apply_writes_results_back_by_slot() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = Catalog::build(manifest(3), &HashSet::new(), &layout(&tmp));

    let mut work = catalog.pending_work();
    // Completion order is whatever the pool yields; reverse to prove slots
    // are what matters.
    work.reverse();
    for (_, rec) in &mut work {
        rec.downloaded = true;
    }
    catalog.apply(work);

    assert!(catalog.records().iter().all(|r| r.downloaded));
    let counts = catalog.counts();
    assert_eq!(counts.downloaded_only, 3);
    assert_eq!(counts.actionable(), 3);
}

#[test]
fn counts_partition_the_set() {
    let tmp = tempfile::tempdir().unwrap();
    let mut records = manifest(5);
    records[0].unavailable = true;
    records[1].downloaded = true;
    records[2].downloaded = true;
    records[2].processed = true;

    let catalog = Catalog::build(records, &HashSet::new(), &layout(&tmp));
    let counts = catalog.counts();
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.downloaded_only, 1);
    assert_eq!(counts.unavailable, 1);
    assert_eq!(counts.done, 1);
    assert_eq!(counts.total(), 5);
    assert_eq!(counts.actionable(), 3);
}
