//! `.wpress` archive decoding and extraction.
//!
//! ## Architecture
//!
//! - [`header`]: fixed-width header records and the terminator check
//! - [`walker`]: the sequential cursor that pairs each header with its payload
//! - [`writer`]: streams one payload into its output file
//! - [`dirs`]: per-run cache of directories already created
//! - [`extractor`]: output directory policy and the public entry points
//!
//! ## Format Overview
//!
//! A `.wpress` file is a flat sequence of entries, each a 4377-byte header
//! followed by exactly `size` payload bytes:
//!
//! | Field  | Offset | Width | Encoding                   |
//! |--------|--------|-------|----------------------------|
//! | name   | 0      | 255   | UTF-8, NUL padded          |
//! | size   | 255    | 14    | ASCII decimal, NUL padded  |
//! | mtime  | 269    | 12    | ASCII, NUL padded          |
//! | prefix | 281    | 4096  | UTF-8, NUL padded          |
//!
//! An all-zero header ends the archive. There is no index, so finding any
//! entry means walking from offset 0.
//!
//! ## Limitations
//!
//! - Decoding only, no archive writing
//! - Modification times are reported but not applied to extracted files

pub mod dirs;
pub mod extractor;
pub mod header;
pub mod path;
pub mod progress;
pub mod walker;
pub mod writer;

pub use dirs::DirCache;
pub use extractor::{ExtractOptions, ExtractSummary, WpressExtractor, extract, list};
pub use header::{EntryHeader, HEADER_SIZE, read_header};
pub use progress::ExtractProgress;
pub use walker::{ArchiveWalker, EntrySink, WalkState, WalkSummary};
pub use writer::{DEFAULT_CHUNK_SIZE, EntryWriter};
