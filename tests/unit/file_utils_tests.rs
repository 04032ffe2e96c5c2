/*!
 * Tests for file system helpers used by the pipeline
 */

use std::fs;

use polysub::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_file_exists_withRealFile_shouldBeTrue() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "a.txt", "x").unwrap();

    assert!(FileManager::file_exists(&path));
    assert!(!FileManager::file_exists(dir.path().join("missing.txt")));
    // A directory is not a file
    assert!(!FileManager::file_exists(dir.path()));
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let dir = create_temp_dir().unwrap();
    let nested = dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();

    assert!(FileManager::dir_exists(&nested));
    // Idempotent
    FileManager::ensure_dir(&nested).unwrap();
}

#[test]
fn test_find_video_files_shouldIgnoreSubdirectories() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();
    create_test_file(&base, "top.mp4", "").unwrap();

    let sub = base.join("nested");
    fs::create_dir(&sub).unwrap();
    create_test_file(&sub, "deep.mp4", "").unwrap();

    let videos = FileManager::find_video_files(&base).unwrap();

    assert_eq!(videos.len(), 1);
    assert!(videos[0].ends_with("top.mp4"));
}

#[test]
fn test_cleanup_temp_files_withMissingFile_shouldNotPanic() {
    let dir = create_temp_dir().unwrap();
    let existing = create_test_file(&dir.path().to_path_buf(), "t.wav", "").unwrap();
    let missing = dir.path().join("gone.wav");

    FileManager::cleanup_temp_files(&[existing.clone(), missing]);

    assert!(!existing.exists());
}

#[test]
fn test_output_is_current_withOlderOutput_shouldBeFalse() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();

    let output = create_test_file(&base, "out.srt", "old").unwrap();
    // Source written after output, so the output is stale
    std::thread::sleep(std::time::Duration::from_millis(20));
    let source = create_test_file(&base, "video.mp4", "new").unwrap();

    assert!(!FileManager::output_is_current(&output, &source));
    assert!(FileManager::output_is_current(&source, &output));
}
