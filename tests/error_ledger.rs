// tests/error_ledger.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use mashwatch::fs::{FileSystem, RealFileSystem};
use mashwatch::ledger::{ERROR_LEDGER_FILE, ErrorLedger};
use tempfile::tempdir;

fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

fn sidecar_lines(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join(ERROR_LEDGER_FILE))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn failure_is_written_to_the_sidecar() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    let broken = dir.path().join("src/broken.js");

    ledger.record_failure(&broken).unwrap();

    assert_eq!(sidecar_lines(dir.path()), vec![broken.to_string_lossy()]);
    assert!(ledger.failed_at(&broken).is_some());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn sidecar_lists_every_failing_asset_in_order() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    let b = dir.path().join("b.css");
    let a = dir.path().join("a.js");

    ledger.record_failure(&b).unwrap();
    ledger.record_failure(&a).unwrap();

    assert_eq!(
        sidecar_lines(dir.path()),
        vec![a.to_string_lossy(), b.to_string_lossy()]
    );
}

#[test]
fn repeated_failures_then_success_removes_the_sidecar() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    let broken = dir.path().join("broken.js");

    for _ in 0..3 {
        ledger.record_failure(&broken).unwrap();
    }
    assert_eq!(sidecar_lines(dir.path()).len(), 1);

    ledger.record_success(&broken).unwrap();

    assert!(ledger.is_empty());
    assert!(!dir.path().join(ERROR_LEDGER_FILE).exists());
}

#[test]
fn success_keeps_other_failures_listed() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    let fixed = dir.path().join("fixed.js");
    let still_broken = dir.path().join("still.css");

    ledger.record_failure(&fixed).unwrap();
    ledger.record_failure(&still_broken).unwrap();
    ledger.record_success(&fixed).unwrap();

    assert_eq!(
        sidecar_lines(dir.path()),
        vec![still_broken.to_string_lossy()]
    );
    assert!(ledger.failed_at(&fixed).is_none());
}

#[test]
fn success_on_empty_ledger_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());

    ledger.record_success(&dir.path().join("ok.js")).unwrap();

    assert!(!dir.path().join(ERROR_LEDGER_FILE).exists());
}

#[test]
fn latest_failure_time_wins() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    let path = PathBuf::from("/p/a.js");
    let earlier = SystemTime::now() - Duration::from_secs(60);
    let later = SystemTime::now();

    ledger.record_failure_at(&path, earlier).unwrap();
    ledger.record_failure_at(&path, later).unwrap();

    assert_eq!(ledger.failed_at(&path), Some(later));
    assert_eq!(ledger.snapshot().len(), 1);
}

#[test]
fn open_discards_records_from_a_previous_run() {
    let dir = tempdir().unwrap();
    let sidecar = dir.path().join(ERROR_LEDGER_FILE);
    fs::write(&sidecar, "/old/run/broken.js\n").unwrap();

    let ledger = ErrorLedger::open(dir.path(), real_fs()).unwrap();

    assert!(ledger.is_empty());
    assert!(!sidecar.exists());
    assert_eq!(ledger.sidecar_path(), sidecar.as_path());
}

#[test]
fn no_temporary_file_is_left_behind() {
    let dir = tempdir().unwrap();
    let mut ledger = ErrorLedger::new(dir.path(), real_fs());
    ledger.record_failure(&dir.path().join("x.js")).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![ERROR_LEDGER_FILE.to_string()]);
}
