use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::video_id::VideoId;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: `<output_dir>/<video_id>_<language>.srt`
    pub fn subtitle_output_path<P: AsRef<Path>>(output_dir: P, video_id: &VideoId, language: &str) -> PathBuf {
        let language = language.replace(['/', '\\'], "_");
        output_dir
            .as_ref()
            .join(format!("{}_{}.srt", video_id, language))
    }

    /// Write raw bytes to a file, creating the parent directory first
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
