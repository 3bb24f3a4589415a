//! File-based host for native platforms.

use super::{BoxFuture, HostError, HostResult, PageHost};
use crate::page::Page;
use std::fs;
use std::path::{Path, PathBuf};

/// Serves one page stored as a JSON file.
pub struct FileHost {
    path: PathBuf,
}

impl FileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the page file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageHost for FileHost {
    fn fetch_page(&self) -> BoxFuture<'_, HostResult<Page>> {
        Box::pin(async move {
            if !self.path.exists() {
                return Err(HostError::NotFound(self.path.display().to_string()));
            }

            let json = fs::read_to_string(&self.path).map_err(|e| {
                HostError::Io(format!("Failed to read {}: {}", self.path.display(), e))
            })?;

            Page::from_json(&json).map_err(|e| {
                HostError::Serialization(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })
        })
    }

    fn update_page(&self, page: &Page) -> BoxFuture<'_, HostResult<()>> {
        let json = match page.to_json() {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(HostError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            // Write beside the target and rename so a failed write never leaves half a page.
            let staging = self.path.with_extension("json.tmp");
            fs::write(&staging, json).map_err(|e| {
                HostError::Io(format!("Failed to write {}: {}", staging.display(), e))
            })?;
            fs::rename(&staging, &self.path).map_err(|e| {
                HostError::Io(format!("Failed to replace {}: {}", self.path.display(), e))
            })
        })
    }
}
