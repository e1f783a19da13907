//! CSV snapshot files on disk.

use std::fs;

use strata_core::Grid;
use strata_engine::{
    run_local, CoordinatorOptions, CsvSnapshotWriter, SnapshotError, SnapshotId, SnapshotKind,
    SnapshotPolicy, SnapshotSink,
};
use strata_test_utils::fixtures::{golden_grid, scratch_dir, small_config};

#[test]
fn writer_creates_directory_and_file() {
    let dir = scratch_dir("csv-create").join("nested");
    let mut writer = CsvSnapshotWriter::new(&dir);
    let id = SnapshotId {
        prefix: "heat",
        kind: SnapshotKind::Initial,
        tick: 0,
    };
    writer.write(&id, &golden_grid()).unwrap();

    let text = fs::read_to_string(dir.join("heat_initial_0.csv")).unwrap();
    assert_eq!(
        text,
        "   0.000,    0.000,    0.000,    0.000,\n\
         \x20  0.000,    4.000,    4.000,    0.000,\n\
         \x20  0.000,    4.000,    4.000,    0.000,\n\
         \x20  0.000,    0.000,    0.000,    0.000,\n"
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unwritable_location_is_an_error_not_a_panic() {
    let base = scratch_dir("csv-blocked");
    fs::create_dir_all(&base).unwrap();
    // A regular file where the output directory should be.
    let blocker = base.join("out");
    fs::write(&blocker, b"not a directory").unwrap();

    let mut writer = CsvSnapshotWriter::new(&blocker);
    let id = SnapshotId {
        prefix: "heat",
        kind: SnapshotKind::Step,
        tick: 1,
    };
    match writer.write(&id, &Grid::new(3, 3).unwrap()) {
        Err(SnapshotError::Io { path, .. }) => assert!(path.ends_with("heat_step_1.csv")),
        other => panic!("expected Io error, got {other:?}"),
    }
    let _ = fs::remove_dir_all(base);
}

#[test]
fn run_writes_one_file_per_snapshot() {
    let dir = scratch_dir("csv-run");
    let options = CoordinatorOptions {
        snapshot: SnapshotPolicy {
            every: Some(1),
            prefix: "grid".to_string(),
            ..SnapshotPolicy::default()
        },
        ..CoordinatorOptions::default()
    };
    let outcome = run_local(small_config(6, 5, 3), 3, options, CsvSnapshotWriter::new(&dir)).unwrap();
    assert_eq!(outcome.report.snapshots_written, 5);

    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "grid_final_3.csv",
            "grid_initial_0.csv",
            "grid_step_1.csv",
            "grid_step_2.csv",
            "grid_step_3.csv"
        ]
    );
    let final_text = fs::read_to_string(dir.join("grid_final_3.csv")).unwrap();
    assert_eq!(final_text.lines().count(), 6);
    let _ = fs::remove_dir_all(dir);
}
