use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::header::{EntryHeader, HEADER_SIZE, read_header};
use super::progress::ExtractProgress;

/// Receives each entry as the walker reaches it.
///
/// `data_offset` is where the payload starts. Sinks read the payload (or
/// not) through `reader` at explicit offsets and never report back a
/// position; the walker alone advances the cursor.
#[async_trait]
pub trait EntrySink: Send {
    async fn accept(
        &mut self,
        reader: &dyn ReadAt,
        header: &EntryHeader,
        data_offset: u64,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Reading,
    Done,
}

/// Counters at the end of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkSummary {
    pub entries: u64,
    pub bytes_consumed: u64,
}

/// Sequential cursor over a `.wpress` archive.
///
/// Headers and payloads are visited strictly in archive order: the payload
/// of entry N is handed out only after its header is parsed, and the header
/// of entry N+1 is read only after the sink is done with entry N.
pub struct ArchiveWalker<'r, R: ReadAt> {
    reader: &'r R,
    offset: u64,
    entries: u64,
    state: WalkState,
}

impl<'r, R: ReadAt> ArchiveWalker<'r, R> {
    pub fn new(reader: &'r R) -> Self {
        Self {
            reader,
            offset: 0,
            entries: 0,
            state: WalkState::Reading,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Walk until the terminator (or end of input), feeding every entry to
    /// `sink` and reporting the running offset to `progress`.
    ///
    /// Any error ends the walk; the walker is `Done` afterwards either way.
    pub async fn run<S, P>(&mut self, sink: &mut S, progress: &mut P) -> Result<WalkSummary>
    where
        S: EntrySink + ?Sized,
        P: ExtractProgress + ?Sized,
    {
        while self.state == WalkState::Reading {
            if let Err(e) = self.step(sink, progress).await {
                self.state = WalkState::Done;
                return Err(e);
            }
        }

        Ok(WalkSummary {
            entries: self.entries,
            bytes_consumed: self.offset,
        })
    }

    async fn step<S, P>(&mut self, sink: &mut S, progress: &mut P) -> Result<()>
    where
        S: EntrySink + ?Sized,
        P: ExtractProgress + ?Sized,
    {
        let header_offset = self.offset;
        let Some(header) = read_header(self.reader, header_offset).await? else {
            debug!(offset = header_offset, entries = self.entries, "end of archive");
            self.state = WalkState::Done;
            return Ok(());
        };

        let data_offset = header_offset + HEADER_SIZE as u64;
        let next_offset = data_offset
            .checked_add(header.size)
            .ok_or_else(|| Error::CorruptHeader {
                offset: header_offset,
                reason: format!("size {} of entry '{}' overflows", header.size, header.name),
            })?;

        debug!(
            offset = header_offset,
            name = %header.name,
            prefix = %header.prefix,
            size = header.size,
            "entry"
        );

        self.offset = data_offset;
        sink.accept(self.reader, &header, data_offset).await?;
        self.offset = next_offset;
        self.entries += 1;

        progress.on_progress(self.offset);
        Ok(())
    }
}
