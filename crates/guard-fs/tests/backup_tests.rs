use guard_fs::BackupStore;
use guard_test_utils::ConfDir;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_backup_copies_into_store_not_conf_dir() {
    let conf = ConfDir::new();
    let source = conf.write("blacklist.filter", "[Common]\nblack_name=\"@eaDir\"\n");
    let store = BackupStore::new(conf.backup_dir());

    let backup = store.backup(&source).unwrap();

    assert_eq!(backup.parent().unwrap(), conf.backup_dir());
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        "[Common]\nblack_name=\"@eaDir\"\n"
    );
    let name = backup.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("blacklist.filter."));
    assert!(name.ends_with(".backup"));
    // Only the source itself remains in the watched directory.
    assert_eq!(fs::read_dir(conf.path()).unwrap().count(), 1);
}

#[test]
fn test_backup_of_missing_source_fails() {
    let conf = ConfDir::new();
    let store = BackupStore::new(conf.backup_dir());

    assert!(store.backup(&conf.file("blacklist.filter")).is_err());
    assert!(conf.backups().is_empty());
}

#[test]
fn test_list_is_newest_first_and_per_file() {
    let conf = ConfDir::new();
    let dir = conf.backup_dir();
    for name in [
        "blacklist.filter.20260101_000000.backup",
        "blacklist.filter.20260301_120000.backup",
        "blacklist.filter.20260201_000000.backup",
        "filter-v4150.20260401_000000.backup",
        "blacklist.filter.notes",
    ] {
        fs::write(dir.join(name), "x").unwrap();
    }
    let store = BackupStore::new(&dir);

    let listed: Vec<String> = store
        .list("blacklist.filter")
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        listed,
        vec![
            "blacklist.filter.20260301_120000.backup",
            "blacklist.filter.20260201_000000.backup",
            "blacklist.filter.20260101_000000.backup",
        ]
    );
}

#[test]
fn test_prune_keeps_newest() {
    let conf = ConfDir::new();
    let dir = conf.backup_dir();
    for day in 1..=5 {
        fs::write(dir.join(format!("blacklist.filter.202601{day:02}_000000.backup")), "x").unwrap();
    }
    let store = BackupStore::new(&dir).with_retention(2);

    let removed = store.prune("blacklist.filter").unwrap();

    assert_eq!(removed, 3);
    assert_eq!(
        conf.backups(),
        vec![
            "blacklist.filter.20260104_000000.backup",
            "blacklist.filter.20260105_000000.backup",
        ]
    );
}

#[test]
fn test_zero_retention_keeps_everything() {
    let conf = ConfDir::new();
    let dir = conf.backup_dir();
    for day in 1..=3 {
        fs::write(dir.join(format!("blacklist.filter.202601{day:02}_000000.backup")), "x").unwrap();
    }
    let store = BackupStore::new(&dir).with_retention(0);

    assert_eq!(store.prune("blacklist.filter").unwrap(), 0);
    assert_eq!(conf.backups().len(), 3);
}

#[test]
fn test_list_on_missing_store_is_empty() {
    let conf = ConfDir::new();
    let store = BackupStore::new(conf.root().join("nowhere"));
    assert!(store.list("blacklist.filter").unwrap().is_empty());
}
