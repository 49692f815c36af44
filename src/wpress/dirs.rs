use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};

/// Directories already created during one extraction run.
///
/// Archives tend to hold many files in few directories, so each directory
/// is created at most once per run.
#[derive(Debug, Default)]
pub struct DirCache {
    created: HashSet<PathBuf>,
}

impl DirCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `path` exists, creating missing ancestors.
    ///
    /// Paths seen before are trusted without touching the filesystem.
    pub async fn ensure(&mut self, path: &Path) -> Result<()> {
        if self.created.contains(path) {
            return Ok(());
        }

        fs::create_dir_all(path)
            .await
            .map_err(|e| Error::fs(path, e))?;
        debug!(path = %path.display(), "created directory");

        self.created.insert(path.to_path_buf());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}
