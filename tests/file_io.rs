//! Loading and saving through the engine

mod common;

use std::fs;

use common::{test_engine, write_file};
use textman::EngineError;

#[test]
fn test_load_sets_path_and_clears_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "notes.txt", "b\na\n");

    let mut engine = test_engine("scratch");
    let content = engine.load_file(&path, "utf-8").unwrap().to_string();

    assert_eq!(content, "b\na\n");
    assert_eq!(engine.text(), "b\na\n");
    assert_eq!(engine.filepath(), Some(path.as_path()));
    assert!(!engine.is_modified());
    assert!(engine.can_undo());
}

#[test]
fn test_edit_then_save_to_current_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "notes.txt", "b\na");

    let mut engine = test_engine("");
    engine.load_file(&path, "utf-8").unwrap();
    engine.sort_lines(false);
    assert!(engine.is_modified());

    let saved = engine.save_file(None, "utf-8").unwrap();
    assert_eq!(saved, path);
    assert!(!engine.is_modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
}

#[test]
fn test_save_as_updates_filepath() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("copy.txt");

    let mut engine = test_engine("content");
    engine.save_file(Some(&target), "utf-8").unwrap();
    assert_eq!(engine.filepath(), Some(target.as_path()));
    assert_eq!(fs::read_to_string(&target).unwrap(), "content");
}

#[test]
fn test_missing_file_leaves_buffer_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = test_engine("keep me");

    let err = engine
        .load_file(dir.path().join("absent.txt"), "utf-8")
        .unwrap_err();
    assert!(matches!(err, EngineError::FileNotFound(_)));
    assert_eq!(engine.text(), "keep me");
    assert!(engine.filepath().is_none());
}

#[test]
fn test_save_without_any_path() {
    let mut engine = test_engine("x");
    assert!(matches!(
        engine.save_file(None, "utf-8"),
        Err(EngineError::MissingPath)
    ));
}

#[test]
fn test_failed_write_keeps_modified_flag() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = test_engine("x");
    let target = dir.path().join("no_such_dir").join("out.txt");

    assert!(matches!(
        engine.save_file(Some(&target), "utf-8"),
        Err(EngineError::Io { .. })
    ));
    assert!(engine.is_modified());
    assert!(engine.filepath().is_none());
}

#[test]
fn test_latin1_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin.txt");
    fs::write(&path, [b'n', b'a', b'\xEF', b'v', b'e']).unwrap();

    let mut engine = test_engine("");
    engine.load_file(&path, "iso-8859-1").unwrap();
    assert_eq!(engine.text(), "naïve");

    engine.to_uppercase();
    engine.save_file(None, "iso-8859-1").unwrap();
    assert_eq!(fs::read(&path).unwrap(), vec![b'N', b'A', 0xCF, b'V', b'E']);
}

#[test]
fn test_unencodable_text_is_rejected_and_file_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "prices.txt", "old");

    let mut engine = test_engine("日本 €");
    let err = engine.save_file(Some(&path), "latin1").unwrap_err();

    assert!(matches!(err, EngineError::Encode { .. }));
    assert!(engine.is_modified());
    assert!(engine.filepath().is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), "old");
}

#[cfg(unix)]
#[test]
fn test_save_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "shared.txt", "before");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let mut engine = test_engine("");
    engine.load_file(&path, "utf-8").unwrap();
    engine.to_uppercase();
    engine.save_file(None, "utf-8").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
    assert_eq!(fs::read_to_string(&path).unwrap(), "BEFORE");
}
