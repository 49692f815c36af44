use clap::Parser;
use std::path::{Path, PathBuf};

use crate::wpress::DEFAULT_CHUNK_SIZE;

#[derive(Parser, Debug)]
#[command(name = "wpress-extract")]
#[command(version)]
#[command(about = "Extract a .wpress archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  wpress-extract backup.wpress -o extracted   extract backup.wpress into extracted/\n  \
  wpress-extract backup.wpress -f             extract into backup/, emptying it first\n  \
  wpress-extract -l backup.wpress             list the archive contents")]
pub struct Cli {
    /// Path to the .wpress archive
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory where the content should be extracted to
    /// (default: archive path without its extension)
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Override existing directory
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// List entries instead of extracting
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Enable debug logging (use RUST_LOG for finer control)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// No progress bar or summary
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Payload copy chunk in bytes
    #[arg(long = "chunk-size", value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl Cli {
    /// Output directory: `--out`, or the input path minus its extension.
    pub fn output_dir(&self) -> PathBuf {
        match &self.out {
            Some(dir) => dir.clone(),
            None => default_output_dir(&self.input),
        }
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    match input.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}
