use tracing::trace;

use crate::error::{Error, Result};
use crate::io::ReadAt;

/// Width of the `name` field.
pub const NAME_SIZE: usize = 255;
/// Width of the ASCII decimal `size` field.
pub const SIZE_SIZE: usize = 14;
/// Width of the `mtime` field.
pub const MTIME_SIZE: usize = 12;
/// Width of the `prefix` field.
pub const PREFIX_SIZE: usize = 4096;

pub const NAME_OFFSET: usize = 0;
pub const SIZE_OFFSET: usize = NAME_OFFSET + NAME_SIZE;
pub const MTIME_OFFSET: usize = SIZE_OFFSET + SIZE_SIZE;
pub const PREFIX_OFFSET: usize = MTIME_OFFSET + MTIME_SIZE;

/// Total width of one header record (4377 bytes).
pub const HEADER_SIZE: usize = PREFIX_OFFSET + PREFIX_SIZE;

/// Parsed `.wpress` entry header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// File name, NUL padding stripped
    pub name: String,
    /// Number of payload bytes following the header
    pub size: u64,
    /// Modification time exactly as stored; never interpreted
    pub mtime: String,
    /// Directory the entry lives in, relative to the archive root
    pub prefix: String,
}

impl EntryHeader {
    /// Decode one header record.
    ///
    /// Returns `Ok(None)` for the all-zero terminator. `offset` is only used
    /// for error context.
    pub fn from_bytes(data: &[u8; HEADER_SIZE], offset: u64) -> Result<Option<Self>> {
        if data.iter().all(|&b| b == 0) {
            return Ok(None);
        }

        let name = text_field(data, NAME_OFFSET, NAME_SIZE);
        let size_text = text_field(data, SIZE_OFFSET, SIZE_SIZE);
        let mtime = text_field(data, MTIME_OFFSET, MTIME_SIZE);
        let prefix = text_field(data, PREFIX_OFFSET, PREFIX_SIZE);

        let size = parse_size(&size_text).ok_or_else(|| Error::CorruptHeader {
            offset,
            reason: format!("invalid size field {size_text:?} for entry '{name}'"),
        })?;

        Ok(Some(Self {
            name,
            size,
            mtime,
            prefix,
        }))
    }
}

/// Read and decode the header starting at `offset`.
///
/// A short read means the archive ended without a terminator, which is
/// treated the same as reading one.
pub async fn read_header<R: ReadAt + ?Sized>(reader: &R, offset: u64) -> Result<Option<EntryHeader>> {
    let mut buf = [0u8; HEADER_SIZE];
    let n = reader
        .read_full_at(offset, &mut buf)
        .await
        .map_err(|source| Error::Read { offset, source })?;

    if n < HEADER_SIZE {
        trace!(offset, bytes = n, "short header read, end of archive");
        return Ok(None);
    }

    EntryHeader::from_bytes(&buf, offset)
}

/// Field contents up to the first NUL, or the whole field if there is none.
fn text_field(data: &[u8], start: usize, width: usize) -> String {
    let field = &data[start..start + width];
    let end = field.iter().position(|&b| b == 0).unwrap_or(width);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn parse_size(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
