//! Image sink writing to a local directory

use std::fs;
use std::path::{Path, PathBuf};

use ai_core::{ImageSink, InvocationError};
use tracing::debug;

/// Writes each image as `{dir}/{suggested_name}`, creating `dir` on demand
#[derive(Debug, Clone)]
pub struct FileImageSink {
    dir: PathBuf,
}

impl FileImageSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a suggested name; only its final component is used
    pub fn path_for(&self, suggested_name: &str) -> Result<PathBuf, InvocationError> {
        Path::new(suggested_name)
            .file_name()
            .map(|name| self.dir.join(name))
            .ok_or_else(|| InvocationError::Sink(format!("invalid file name {suggested_name:?}")))
    }
}

impl ImageSink for FileImageSink {
    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<(), InvocationError> {
        let path = self.path_for(suggested_name)?;

        fs::create_dir_all(&self.dir)
            .map_err(|e| InvocationError::Sink(format!("{}: {e}", self.dir.display())))?;
        fs::write(&path, bytes)
            .map_err(|e| InvocationError::Sink(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote image");
        Ok(())
    }
}
