use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::dirs::DirCache;
use super::header::EntryHeader;
use super::path::entry_output_path;
use super::walker::EntrySink;

/// Default payload copy chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Writes entries below an output root, streaming each payload in chunks.
pub struct EntryWriter {
    root: PathBuf,
    dirs: DirCache,
    buf: Vec<u8>,
}

impl EntryWriter {
    pub fn new(root: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            root: root.into(),
            dirs: DirCache::new(),
            buf: vec![0u8; chunk_size.max(1)],
        }
    }

    /// Directories created so far.
    pub fn dirs(&self) -> &DirCache {
        &self.dirs
    }

    /// Copy `header.size` bytes starting at `data_offset` into
    /// `root/<prefix>/<name>`, replacing any file already there.
    ///
    /// Returns the output path. Does not move any cursor; the caller owns
    /// the offset.
    pub async fn write_entry(
        &mut self,
        reader: &dyn ReadAt,
        header: &EntryHeader,
        data_offset: u64,
    ) -> Result<PathBuf> {
        let path = entry_output_path(&self.root, header, data_offset)?;
        if let Some(parent) = path.parent() {
            self.dirs.ensure(parent).await?;
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| Error::fs(&path, e))?;

        let copied = self.copy_payload(reader, header, data_offset, &mut file, &path).await;
        // Flush even when the copy failed so partial output is on disk.
        let flushed = file.flush().await.map_err(|e| Error::fs(&path, e));
        copied?;
        flushed?;

        debug!(path = %path.display(), size = header.size, "extracted entry");
        Ok(path)
    }

    async fn copy_payload(
        &mut self,
        reader: &dyn ReadAt,
        header: &EntryHeader,
        data_offset: u64,
        file: &mut fs::File,
        path: &Path,
    ) -> Result<()> {
        let mut written = 0u64;
        while written < header.size {
            let want = (header.size - written).min(self.buf.len() as u64) as usize;
            let offset = data_offset + written;
            let n = reader
                .read_at(offset, &mut self.buf[..want])
                .await
                .map_err(|source| Error::Read { offset, source })?;

            if n == 0 {
                return Err(Error::TruncatedArchive {
                    name: header.name.clone(),
                    offset: data_offset,
                    expected: header.size,
                    actual: written,
                });
            }

            file.write_all(&self.buf[..n])
                .await
                .map_err(|e| Error::fs(path, e))?;
            written += n as u64;
            trace!(offset, bytes = n, "copied chunk");
        }
        Ok(())
    }
}

#[async_trait]
impl EntrySink for EntryWriter {
    async fn accept(
        &mut self,
        reader: &dyn ReadAt,
        header: &EntryHeader,
        data_offset: u64,
    ) -> Result<()> {
        self.write_entry(reader, header, data_offset).await.map(|_| ())
    }
}
