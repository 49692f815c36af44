//! # wpress-extract
//!
//! Extract `.wpress` backup archives produced by WordPress migration
//! plugins.
//!
//! The archive is walked strictly front to back with a single explicit
//! offset. Every read names its own position through the [`ReadAt`] trait,
//! so header parsing and payload copying can never disagree about where the
//! next byte lives.
//!
//! ## Features
//!
//! - Streaming extraction with bounded memory per entry
//! - Listing entries without touching the payloads
//! - Refuses to clobber a non-empty output directory unless asked to
//! - Rejects entry paths that would land outside the output directory
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use wpress_extract::{ExtractOptions, extract};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = extract(
//!         Path::new("backup.wpress"),
//!         Path::new("backup"),
//!         &ExtractOptions::default(),
//!         &mut (),
//!     )
//!     .await?;
//!     println!("{} files", summary.entries);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod wpress;

#[cfg(test)]
pub(crate) mod test;

pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt};
pub use wpress::{
    EntryHeader, ExtractOptions, ExtractProgress, ExtractSummary, WpressExtractor, extract, list,
};
