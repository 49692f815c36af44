use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::io::{LocalFileReader, ReadAt};

use super::header::EntryHeader;
use super::progress::ExtractProgress;
use super::walker::{ArchiveWalker, EntrySink};
use super::writer::{DEFAULT_CHUNK_SIZE, EntryWriter};

/// Knobs for [`extract`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Empty the output directory first instead of refusing a non-empty one
    pub overwrite: bool,
    /// Payload copy chunk in bytes; bounds memory per entry
    pub chunk_size: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractSummary {
    pub entries: u64,
    pub bytes_consumed: u64,
}

/// `.wpress` archive extractor over any [`ReadAt`] source
pub struct WpressExtractor<R: ReadAt> {
    reader: Arc<R>,
}

impl<R: ReadAt> WpressExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// Total size of the underlying archive
    pub fn size(&self) -> u64 {
        self.reader.size()
    }

    /// List every entry without reading any payload
    pub async fn list_entries(&self) -> Result<Vec<EntryHeader>> {
        let mut sink = EntryList::default();
        ArchiveWalker::new(self.reader.as_ref())
            .run(&mut sink, &mut ())
            .await?;
        Ok(sink.entries)
    }

    /// Extract every entry below `output_dir`.
    ///
    /// No output directory policy is applied here; see [`extract`].
    pub async fn extract_to<P>(
        &self,
        output_dir: &Path,
        chunk_size: usize,
        progress: &mut P,
    ) -> Result<ExtractSummary>
    where
        P: ExtractProgress + ?Sized,
    {
        let mut writer = EntryWriter::new(output_dir, chunk_size);
        let summary = ArchiveWalker::new(self.reader.as_ref())
            .run(&mut writer, &mut *progress)
            .await?;
        debug!(directories = writer.dirs().len(), "directories created");

        Ok(ExtractSummary {
            entries: summary.entries,
            bytes_consumed: summary.bytes_consumed,
        })
    }
}

/// Extract the archive at `input` into `output_dir`.
///
/// Without `overwrite`, a non-empty `output_dir` is refused; with it, the
/// directory is emptied first. Files written before a failure stay on disk.
pub async fn extract<P>(
    input: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    progress: &mut P,
) -> Result<ExtractSummary>
where
    P: ExtractProgress + ?Sized,
{
    ensure_input(input).await?;
    prepare_output_dir(output_dir, options.overwrite).await?;

    let reader = LocalFileReader::new(input).map_err(|e| Error::fs(input, e))?;
    let extractor = WpressExtractor::new(Arc::new(reader));

    let total = extractor.size();
    info!(
        input = %input.display(),
        output = %output_dir.display(),
        size = total,
        "extracting archive"
    );
    progress.on_start(total);

    let summary = extractor
        .extract_to(output_dir, options.chunk_size, &mut *progress)
        .await?;

    info!(
        entries = summary.entries,
        bytes = summary.bytes_consumed,
        "extraction finished"
    );
    progress.on_finish(summary.entries);
    Ok(summary)
}

/// List the entries of the archive at `input`.
pub async fn list(input: &Path) -> Result<Vec<EntryHeader>> {
    ensure_input(input).await?;
    let reader = LocalFileReader::new(input).map_err(|e| Error::fs(input, e))?;
    WpressExtractor::new(Arc::new(reader)).list_entries().await
}

async fn ensure_input(input: &Path) -> Result<()> {
    match fs::metadata(input).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::InputNotFound {
            path: input.to_path_buf(),
        }),
        Err(e) => Err(Error::fs(input, e)),
    }
}

async fn prepare_output_dir(dir: &Path, overwrite: bool) -> Result<()> {
    if overwrite {
        empty_dir(dir).await?;
    } else if !is_dir_empty(dir).await? {
        return Err(Error::OutputNotEmpty {
            path: dir.to_path_buf(),
        });
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::fs(dir, e))
}

/// A missing directory counts as empty.
async fn is_dir_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(Error::fs(dir, e)),
    };

    let first = entries.next_entry().await.map_err(|e| Error::fs(dir, e))?;
    Ok(first.is_none())
}

/// Remove everything inside `dir`, keeping `dir` itself.
async fn empty_dir(dir: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::fs(dir, e)),
    };

    while let Some(entry) = entries.next_entry().await.map_err(|e| Error::fs(dir, e))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| Error::fs(&path, e))?;
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(|e| Error::fs(&path, e))?;
    }

    debug!(dir = %dir.display(), "emptied output directory");
    Ok(())
}

/// Collects headers; checks that each payload fits in the input.
#[derive(Default)]
struct EntryList {
    entries: Vec<EntryHeader>,
}

#[async_trait]
impl EntrySink for EntryList {
    async fn accept(
        &mut self,
        reader: &dyn ReadAt,
        header: &EntryHeader,
        data_offset: u64,
    ) -> Result<()> {
        let available = reader.size().saturating_sub(data_offset);
        if available < header.size {
            return Err(Error::TruncatedArchive {
                name: header.name.clone(),
                offset: data_offset,
                expected: header.size,
                actual: available,
            });
        }
        self.entries.push(header.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ArchiveBuilder;

    #[derive(Default)]
    struct Events(Vec<String>);

    impl ExtractProgress for Events {
        fn on_start(&mut self, total_bytes: u64) {
            self.0.push(format!("start {total_bytes}"));
        }

        fn on_progress(&mut self, bytes_consumed: u64) {
            self.0.push(format!("progress {bytes_consumed}"));
        }

        fn on_finish(&mut self, entry_count: u64) {
            self.0.push(format!("finish {entry_count}"));
        }
    }

    fn write_archive(dir: &Path, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join("backup.wpress");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[tokio::test]
    async fn lists_entries_in_archive_order() {
        let data = ArchiveBuilder::new()
            .entry("wp-config.php", ".", b"<?php")
            .entry("style.css", "wp-content/themes/x", b"body{}")
            .build();
        let extractor = WpressExtractor::new(Arc::new(data));
        let entries = extractor.list_entries().await.unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["wp-config.php", "style.css"]);
        assert_eq!(entries[1].prefix, "wp-content/themes/x");
        assert_eq!(entries[1].size, 6);
        assert_eq!(entries[1].mtime, "1700000000");
    }

    #[tokio::test]
    async fn listing_detects_truncated_payload() {
        let data = ArchiveBuilder::new()
            .raw_entry("short", "100", "", b"only this")
            .build_unterminated();
        let err = WpressExtractor::new(Arc::new(data))
            .list_entries()
            .await
            .unwrap_err();
        match err {
            Error::TruncatedArchive { actual, expected, .. } => {
                assert_eq!(actual, 9);
                assert_eq!(expected, 100);
            }
            other => panic!("expected TruncatedArchive, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn callbacks_fire_in_lifecycle_order() {
        let tmp = tempfile::tempdir().unwrap();
        let data = ArchiveBuilder::new().entry("a", "", b"12").build();
        let total = data.len();
        let input = write_archive(tmp.path(), &data);

        let mut events = Events::default();
        let summary = extract(
            &input,
            &tmp.path().join("out"),
            &ExtractOptions::default(),
            &mut events,
        )
        .await
        .unwrap();

        let h = crate::wpress::header::HEADER_SIZE;
        assert_eq!(
            events.0,
            vec![
                format!("start {total}"),
                format!("progress {}", h + 2),
                "finish 1".to_string(),
            ]
        );
        assert_eq!(summary.entries, 1);
    }

    #[tokio::test]
    async fn missing_output_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_archive(tmp.path(), &ArchiveBuilder::new().build());
        let out = tmp.path().join("new/out");

        let summary = extract(&input, &out, &ExtractOptions::default(), &mut ())
            .await
            .unwrap();
        assert_eq!(summary.entries, 0);
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn overwrite_keeps_directory_but_drops_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        std::fs::create_dir_all(out.join("nested/deeper")).unwrap();
        std::fs::write(out.join("nested/deeper/f"), b"x").unwrap();
        std::fs::write(out.join("top"), b"y").unwrap();

        empty_dir(&out).await.unwrap();
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_extraction_skips_finish() {
        let tmp = tempfile::tempdir().unwrap();
        let data = ArchiveBuilder::new()
            .entry("ok", "", b"fine")
            .raw_entry("bad", "x", "", b"")
            .build();
        let input = write_archive(tmp.path(), &data);

        let mut events = Events::default();
        let err = extract(
            &input,
            &tmp.path().join("out"),
            &ExtractOptions::default(),
            &mut events,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::CorruptHeader { .. }));
        assert!(!events.0.iter().any(|e| e.starts_with("finish")));
        assert_eq!(std::fs::read(tmp.path().join("out/ok")).unwrap(), b"fine");
    }
}
