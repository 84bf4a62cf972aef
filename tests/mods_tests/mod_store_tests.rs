//! Tests for ModStore

use std::fs;
use std::io::Cursor;

use craftgate::{Config, GateError, ModStore};
use tempfile::TempDir;

fn setup_mods_dir() -> (TempDir, ModStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = ModStore::new(temp_dir.path());
    (temp_dir, store)
}

#[test]
fn test_list_empty() {
    let (_temp, store) = setup_mods_dir();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_list_sorted_files_only() {
    let (temp, store) = setup_mods_dir();
    fs::write(temp.path().join("zeta.jar"), b"z").unwrap();
    fs::write(temp.path().join("alpha.jar"), b"a").unwrap();
    fs::create_dir(temp.path().join("config")).unwrap();

    assert_eq!(store.list().unwrap(), vec!["alpha.jar", "zeta.jar"]);
}

#[test]
fn test_list_skips_in_flight_uploads() {
    let (temp, store) = setup_mods_dir();
    fs::write(temp.path().join("jei.jar"), b"j").unwrap();
    let staged = tempfile::Builder::new()
        .prefix(".craftgate-upload-")
        .tempfile_in(temp.path())
        .unwrap();

    assert!(staged.path().exists());
    assert_eq!(store.list().unwrap(), vec!["jei.jar"]);
    assert!(matches!(
        store.save(".craftgate-upload-x", Cursor::new(b"x".to_vec())),
        Err(GateError::InvalidModName(_))
    ));
}

#[test]
fn test_list_missing_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = ModStore::new(temp_dir.path().join("missing"));

    assert!(matches!(store.list(), Err(GateError::Io(_))));
}

#[test]
fn test_save_returns_new_listing() {
    let (temp, store) = setup_mods_dir();

    let listing = store.save("jei.jar", Cursor::new(b"jar bytes".to_vec())).unwrap();

    assert_eq!(listing, vec!["jei.jar"]);
    assert_eq!(fs::read(temp.path().join("jei.jar")).unwrap(), b"jar bytes");
}

#[test]
fn test_save_replaces_existing_file() {
    let (temp, store) = setup_mods_dir();
    store.save("jei.jar", Cursor::new(b"old".to_vec())).unwrap();

    let listing = store.save("jei.jar", Cursor::new(b"new".to_vec())).unwrap();

    assert_eq!(listing, vec!["jei.jar"]);
    assert_eq!(fs::read(temp.path().join("jei.jar")).unwrap(), b"new");
}

#[test]
fn test_delete_returns_new_listing() {
    let (_temp, store) = setup_mods_dir();
    store.save("a.jar", Cursor::new(Vec::new())).unwrap();
    store.save("b.jar", Cursor::new(Vec::new())).unwrap();

    let listing = store.delete("a.jar").unwrap();

    assert_eq!(listing, vec!["b.jar"]);
}

#[test]
fn test_delete_missing_is_not_found() {
    let (_temp, store) = setup_mods_dir();

    match store.delete("ghost.jar") {
        Err(GateError::ModNotFound(name)) => assert_eq!(name, "ghost.jar"),
        other => panic!("Expected ModNotFound, got {:?}", other),
    }
}

#[test]
fn test_names_cannot_escape_directory() {
    let (temp, store) = setup_mods_dir();
    let outside = temp.path().join("..").join("escaped.jar");

    for bad in ["", ".", "..", "../escaped.jar", "sub/dir.jar", "c:\\evil.jar"] {
        assert!(
            matches!(
                store.save(bad, Cursor::new(b"x".to_vec())),
                Err(GateError::InvalidModName(_))
            ),
            "accepted {:?}",
            bad
        );
        assert!(matches!(store.delete(bad), Err(GateError::InvalidModName(_))));
    }
    assert!(!outside.exists());
}

#[test]
fn test_from_config_uses_mods_subdirectory() {
    let config = Config::builder().base_dir("/srv/data").build();
    let store = ModStore::from_config(&config);

    assert_eq!(store.dir(), std::path::Path::new("/srv/data/mods"));
}
