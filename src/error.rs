use std::io;
use std::path::PathBuf;

/// Errors produced while decoding or extracting a `.wpress` archive.
///
/// Every variant is fatal to the extraction call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input file at location \"{}\" could not be found", path.display())]
    InputNotFound { path: PathBuf },

    #[error(
        "output dir \"{}\" is not empty, clear it first or use the --force option to override it",
        path.display()
    )]
    OutputNotEmpty { path: PathBuf },

    #[error("corrupt header at offset {offset}: {reason}")]
    CorruptHeader { offset: u64, reason: String },

    #[error(
        "truncated archive: entry '{name}' at offset {offset} declares {expected} bytes but only {actual} are available"
    )]
    TruncatedArchive {
        name: String,
        offset: u64,
        expected: u64,
        actual: u64,
    },

    #[error("entry '{name}' with prefix '{prefix}' at offset {offset} resolves outside the output directory")]
    UnsafePath {
        name: String,
        prefix: String,
        offset: u64,
    },

    #[error("filesystem error at '{}': {source}", path.display())]
    Filesystem { path: PathBuf, source: io::Error },

    #[error("failed to read archive at offset {offset}: {source}")]
    Read { offset: u64, source: io::Error },
}

impl Error {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
