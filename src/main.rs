//! Main entry point for the wpress-extract CLI application.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::EnvFilter;

use wpress_extract::{Cli, ExtractOptions, ExtractProgress, extract, list};

const BAR_TEMPLATE: &str = "Progress: {bar:40.cyan/blue} | {percent}% ({bytes}/{total_bytes})";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Only install a subscriber when asked, so extraction output stays clean.
fn init_logging(verbose: bool) -> Result<()> {
    if verbose || std::env::var("RUST_LOG").is_ok() {
        let directive = if verbose {
            "wpress_extract=debug"
        } else {
            "wpress_extract=warn"
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    if cli.list {
        return list_entries(&cli.input).await;
    }

    let output_dir = cli.output_dir();
    let options = ExtractOptions {
        overwrite: cli.force,
        chunk_size: cli.chunk_size,
    };

    let mut reporter = ProgressReporter::new(&output_dir, cli.quiet);
    let result = extract(&cli.input, &output_dir, &options, &mut reporter).await;
    if result.is_err() {
        reporter.abandon();
    }
    result?;
    Ok(())
}

async fn list_entries(input: &Path) -> Result<()> {
    let entries = list(input).await?;

    println!("{:>12}  {:>12}  Name", "Length", "MTime");
    println!("{}", "-".repeat(60));

    let mut total = 0u64;
    for entry in &entries {
        let path = Path::new(&entry.prefix).join(&entry.name);
        println!("{:>12}  {:>12}  {}", entry.size, entry.mtime, path.display());
        total += entry.size;
    }

    println!("{}", "-".repeat(60));
    println!("{:>12}  {:>12}  {} files", total, "", entries.len());
    Ok(())
}

/// Progress bar plus the start/finish messages an operator sees.
struct ProgressReporter {
    bar: ProgressBar,
    target: String,
    quiet: bool,
}

impl ProgressReporter {
    fn new(output_dir: &Path, quiet: bool) -> Self {
        let bar = ProgressBar::hidden();
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█░ "));
        }
        Self {
            bar,
            target: display_relative(output_dir),
            quiet,
        }
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}

impl ExtractProgress for ProgressReporter {
    fn on_start(&mut self, total_bytes: u64) {
        if self.quiet {
            return;
        }
        println!("Extracting content to: {}/", self.target);
        self.bar.set_length(total_bytes);
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn on_progress(&mut self, bytes_consumed: u64) {
        self.bar.set_position(bytes_consumed);
    }

    fn on_finish(&mut self, entry_count: u64) {
        if let Some(total) = self.bar.length() {
            self.bar.set_position(total);
        }
        self.bar.finish();
        if !self.quiet {
            println!();
            println!("Successfully extracted {entry_count} files.");
        }
    }
}

/// Output directory relative to the working directory when possible.
fn display_relative(dir: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| dir.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| dir.to_path_buf())
        .display()
        .to_string()
}
