//! # FileWriter: one file per value
//!
//! Writes each received value to `<dir>/string_<yyyyMMdd_HHmmss_SSS>.txt`
//! (local time, millisecond resolution). Two values received within the same
//! millisecond map to the same file name; the later one wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::ReceiveError;
use crate::subscribers::Subscriber;

/// Default output directory.
pub const DEFAULT_DIR: &str = "/tmp/randcast-demo";

/// Subscriber persisting values as individual files.
#[derive(Debug, Clone)]
pub struct FileWriter {
    dir: PathBuf,
}

impl FileWriter {
    /// Creates the writer, creating `dir` (and parents) if missing.
    pub async fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        if tokio::fs::try_exists(&dir).await? {
            debug!(dir = %dir.display(), "output directory already exists");
        } else {
            tokio::fs::create_dir_all(&dir).await?;
            info!(dir = %dir.display(), "created output directory");
        }
        Ok(Self { dir })
    }

    /// Directory values are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a value received at `at`.
    pub fn file_name(at: DateTime<Local>) -> String {
        format!("string_{}.txt", at.format("%Y%m%d_%H%M%S_%3f"))
    }
}

#[async_trait]
impl Subscriber for FileWriter {
    async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
        let path = self.dir.join(Self::file_name(Local::now()));
        tokio::fs::write(&path, value.as_bytes()).await?;
        debug!(path = %path.display(), value, "wrote value to file");
        Ok(())
    }

    fn name(&self) -> &str {
        "file-writer"
    }
}
