use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Video extensions the pipeline accepts
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "avi", "mov", "mkv", "flv", "wmv"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Check whether a path has a recognized video extension
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                VIDEO_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Find video files directly inside a directory (non-recursive), sorted
    /// by path for a stable processing order.
    pub fn find_video_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_video_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Serialize a value as pretty JSON to a file
    pub fn save_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize value to JSON")?;
        Self::write_to_file(path, &json)
    }

    /// Remove temporary files, warning rather than failing when one cannot
    /// be removed.
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            if path.exists() {
                match fs::remove_file(path) {
                    Ok(()) => debug!("Removed temporary file: {}", path.display()),
                    Err(e) => warn!("Failed to remove temporary file {}: {}", path.display(), e),
                }
            }
        }
    }

    /// Check whether an output file is newer than its source, meaning the
    /// source was already processed and can be skipped.
    pub fn output_is_current<P1: AsRef<Path>, P2: AsRef<Path>>(output: P1, source: P2) -> bool {
        let (output, source) = (output.as_ref(), source.as_ref());
        if !output.exists() {
            return false;
        }

        match (fs::metadata(output), fs::metadata(source)) {
            (Ok(out_meta), Ok(src_meta)) => match (out_meta.modified(), src_meta.modified()) {
                (Ok(out_time), Ok(src_time)) => out_time >= src_time,
                _ => false,
            },
            _ => false,
        }
    }
}
