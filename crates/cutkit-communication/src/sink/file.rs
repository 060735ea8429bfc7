//! File sink: writes program text to disk.

use super::{ByteSink, DeliveryReceipt};
use cutkit_core::{ConfigurationError, DeliveryError};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the program as UTF-8 to a single file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Resolve `path` against `base_dir` when it is relative
    ///
    /// An empty path is rejected here, before any program is compiled.
    pub fn new(path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        if path.to_string_lossy().trim().is_empty() {
            return Err(ConfigurationError::EmptyOutputPath);
        }
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.as_ref().join(path)
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSink for FileSink {
    fn deliver(&mut self, text: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let write_err = |e: std::io::Error| DeliveryError::Write {
            target: self.describe(),
            reason: e.to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, text).map_err(write_err)?;
        tracing::info!("Wrote {} bytes to {}", text.len(), self.path.display());
        Ok(DeliveryReceipt {
            target: self.describe(),
            bytes_written: text.len(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
