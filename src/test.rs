//! Archive fixtures for unit tests.

use crate::wpress::header::{
    HEADER_SIZE, MTIME_OFFSET, MTIME_SIZE, NAME_OFFSET, NAME_SIZE, PREFIX_OFFSET, PREFIX_SIZE,
    SIZE_OFFSET, SIZE_SIZE,
};

/// Encode a raw header record; each field is NUL padded to its width.
pub(crate) fn encode_header(name: &str, size: &str, mtime: &str, prefix: &str) -> [u8; HEADER_SIZE] {
    let mut raw = [0u8; HEADER_SIZE];
    for (text, start, width) in [
        (name, NAME_OFFSET, NAME_SIZE),
        (size, SIZE_OFFSET, SIZE_SIZE),
        (mtime, MTIME_OFFSET, MTIME_SIZE),
        (prefix, PREFIX_OFFSET, PREFIX_SIZE),
    ] {
        let bytes = text.as_bytes();
        assert!(bytes.len() <= width, "field {text:?} wider than {width}");
        raw[start..start + bytes.len()].copy_from_slice(bytes);
    }
    raw
}

#[derive(Default)]
pub(crate) struct ArchiveBuilder {
    data: Vec<u8>,
}

impl ArchiveBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn entry(self, name: &str, prefix: &str, payload: &[u8]) -> Self {
        self.raw_entry(name, &payload.len().to_string(), prefix, payload)
    }

    /// Entry whose size field is written verbatim, whatever the payload.
    pub(crate) fn raw_entry(mut self, name: &str, size: &str, prefix: &str, payload: &[u8]) -> Self {
        self.data
            .extend_from_slice(&encode_header(name, size, "1700000000", prefix));
        self.data.extend_from_slice(payload);
        self
    }

    pub(crate) fn build(mut self) -> Vec<u8> {
        self.data.extend_from_slice(&[0u8; HEADER_SIZE]);
        self.data
    }

    pub(crate) fn build_unterminated(self) -> Vec<u8> {
        self.data
    }
}
