use std::fs;

use fintrack_core::{KeyValueStore, Tracker};
use fintrack_domain::TransactionKind;
use fintrack_storage_json::{JsonFileStore, StoragePaths};
use tempfile::tempdir;

#[test]
fn json_store_persists_values_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());

    let mut store = JsonFileStore::open(paths.clone()).expect("open store");
    assert_eq!(store.get("balance"), None);
    store.set("balance", "120").expect("set balance");
    store.set("goal", "500").expect("set goal");
    assert!(paths.store_file.exists());

    let reopened = JsonFileStore::open(paths).expect("reopen store");
    assert_eq!(reopened.get("balance").as_deref(), Some("120"));
    assert_eq!(reopened.get("goal").as_deref(), Some("500"));
    assert_eq!(reopened.keys().collect::<Vec<_>>(), vec!["balance", "goal"]);
}

#[test]
fn tracker_state_survives_a_restart() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());

    {
        let store = JsonFileStore::open(paths.clone()).expect("open store");
        let mut tracker = Tracker::open(store);
        tracker.set_initial_balance(100.0).unwrap();
        tracker
            .add_transaction(TransactionKind::Credit, 50.0, "salary")
            .unwrap();
        tracker
            .add_transaction(TransactionKind::Debit, 30.0, "food")
            .unwrap();
        tracker.set_goal(200.0).unwrap();
    }

    let tracker = Tracker::open(JsonFileStore::open(paths).expect("reopen store"));
    assert_eq!(tracker.ledger().current_balance(), 120.0);
    assert_eq!(tracker.ledger().len(), 2);
    assert_eq!(tracker.goal().goal(), Some(200.0));
    assert_eq!(tracker.goal_split().remaining, 80.0);
}

#[test]
fn failed_write_preserves_original_file() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    let mut store = JsonFileStore::open(paths.clone()).expect("open store");
    store.set("balance", "10").expect("initial write");
    let original = fs::read_to_string(&paths.store_file).expect("read store");

    // A directory squatting on the temp path makes File::create fail.
    let tmp_path = paths.store_file.with_extension("json.tmp");
    fs::create_dir_all(&tmp_path).unwrap();

    assert!(store.set("balance", "99").is_err());
    let current = fs::read_to_string(&paths.store_file).expect("read after failure");
    assert_eq!(current, original);

    fs::remove_dir_all(&tmp_path).unwrap();
}

#[test]
fn corrupt_store_starts_empty_and_keeps_a_copy() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    fs::write(&paths.store_file, "this is not json").unwrap();

    let store = JsonFileStore::open(paths).expect("open store");
    assert_eq!(store.keys().count(), 0);

    let backups = store.list_backups().expect("list backups");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].id.ends_with("_corrupt.json"));
    let preserved = fs::read_to_string(&backups[0].path).unwrap();
    assert_eq!(preserved, "this is not json");
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    let mut tracker = Tracker::open(JsonFileStore::open(paths).expect("open store"));
    tracker.set_initial_balance(100.0).unwrap();
    tracker
        .add_transaction(TransactionKind::Credit, 25.0, "refund")
        .unwrap();

    let info = tracker
        .store()
        .backup(Some("before cleanup"))
        .expect("create backup");
    assert!(info.id.starts_with("store_"));
    assert!(info.id.ends_with("_before-cleanup.json"));
    assert!(info.created_at.is_some());

    tracker.delete_transaction(0).unwrap();
    assert_eq!(tracker.ledger().current_balance(), 100.0);

    let backups = tracker.store().list_backups().expect("list backups");
    let target = backups
        .iter()
        .find(|backup| backup.id == info.id)
        .cloned()
        .expect("backup listed");
    tracker
        .store_mut()
        .restore_backup(&target)
        .expect("restore backup");
    tracker.reload();

    assert_eq!(tracker.ledger().len(), 1);
    assert_eq!(tracker.ledger().current_balance(), 125.0);
    let after = tracker.store().list_backups().unwrap();
    assert!(after.iter().any(|backup| backup.id.contains("pre-restore")));
}

#[test]
fn retention_prunes_oldest_backups() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    let mut store = JsonFileStore::with_retention(paths, 2).expect("open store");
    store.set("balance", "1").unwrap();

    for note in ["d", "c", "b", "a"] {
        store.backup(Some(note)).expect("backup");
    }

    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups[0].id.ends_with("_a.json"));
    assert!(backups[1].id.ends_with("_b.json"));
}

#[test]
fn back_to_back_backups_are_kept_apart() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    let mut store = JsonFileStore::open(paths).expect("open store");
    store.set("balance", "1").unwrap();

    let first = store.backup(None).expect("first backup");
    store.set("balance", "2").unwrap();
    let second = store.backup(None).expect("second backup");

    assert_ne!(first.id, second.id);
    assert!(second.created_at > first.created_at);
    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert_eq!(backups[0].id, second.id);
    assert!(fs::read_to_string(&first.path).unwrap().contains("\"1\""));
    assert!(fs::read_to_string(&second.path).unwrap().contains("\"2\""));
}

#[test]
fn retention_keeps_the_newest_backup_whatever_its_note() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::in_dir(dir.path());
    let mut store = JsonFileStore::with_retention(paths, 1).expect("open store");
    store.set("balance", "1").unwrap();

    store.backup(Some("z")).expect("backup z");
    let newest = store.backup(Some("a")).expect("backup a");

    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].id, newest.id);
    assert!(newest.path.exists());
}
