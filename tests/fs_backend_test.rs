use recordz::domains::{FOOD, TASKS};
use recordz::model::Value;
use recordz::store::backend::StorageBackend;
use recordz::store::fs::FsBackend;
use recordz::store::{Persistence, RecordStore, SlotState};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_slot_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.read_slot("tasks").unwrap(), None);

    backend.write_slot("tasks", "[]").unwrap();
    assert_eq!(backend.read_slot("tasks").unwrap(), Some("[]".to_string()));

    backend.write_slot("tasks", "[1]").unwrap();
    assert_eq!(backend.read_slot("tasks").unwrap(), Some("[1]".to_string()));
    assert_eq!(backend.read_slot("food").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    backend.write_slot("tasks", "first").unwrap();
    backend.write_slot("tasks", "second").unwrap();

    let expected_path = dir.path().join("data").join("tasks.json");
    assert_eq!(backend.slot_path("tasks"), expected_path);
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "second");

    for entry in fs::read_dir(dir.path().join("data")).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_store_survives_reopen() {
    let (dir, backend) = setup();
    let mut store = RecordStore::open(&TASKS, backend);
    let record = store
        .create(TASKS.parse_fields([("title", "Persist me")]).unwrap())
        .unwrap();
    assert!(store.take_notice().is_none());

    let reopened = RecordStore::open(&TASKS, FsBackend::new(dir.path().join("data")));
    assert_eq!(reopened.origin(), &SlotState::Stored);
    assert_eq!(reopened.get(&record.id), Some(&record));
    assert_eq!(reopened.len(), store.len());
}

#[test]
fn test_corrupt_file_falls_back_to_samples() {
    let (dir, backend) = setup();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data").join("food.json"), "{ truncated").unwrap();

    let store = RecordStore::open(&FOOD, backend);
    assert!(matches!(store.origin(), SlotState::Corrupt(_)));
    assert_eq!(store.len(), FOOD.seed.len());
    assert_eq!(
        store.records()[0].get("meal"),
        Some(&Value::text("Breakfast"))
    );
}

#[test]
fn test_unwritable_root_is_a_storage_write_error() {
    let (dir, _backend) = setup();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let persistence = Persistence::new(FsBackend::new(blocker.join("data")));
    let err = persistence.save("tasks", &[1, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        recordz::error::RecordzError::StorageWrite { .. }
    ));
}
