//! Load command, tracing setup, and terminal progress.

use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use kbload_core::loader::{LoadReporter, LoadSummary, load_kb};
use kbload_shared::{LoadRequest, load_config, load_config_from};
use kbload_storage::Storage;
use tracing::info;

use crate::args::{Cli, LogFormat};

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Crates whose events are shown at the selected verbosity.
const LOG_TARGETS: &[&str] = &["kbload", "kbload_core", "kbload_storage", "kbload_shared"];

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn default_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Load command
// ---------------------------------------------------------------------------

/// Load the requested file and print the one-line summary to stdout.
pub(crate) async fn run(cli: &Cli, request: LoadRequest) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };

    info!(
        kb = %request.kb_name,
        file = %request.file_path.display(),
        db = %db_path.display(),
        "loading knowledge base"
    );

    let storage = Storage::open(&db_path).await?;
    let reporter = CliProgress::new();
    let summary = load_kb(&request, &storage, &config.loader.delimiter, &reporter).await?;

    println!("Added {} entries to {}", summary.inserted, summary.kb_name);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl LoadReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn malformed(&self, line_number: usize, fields: &[String]) {
        // Always printed, even when the spinner is hidden.
        self.spinner
            .suspend(|| eprintln!("Error: malformed entry on line {line_number}: {fields:?}"));
    }

    fn inserted(&self, total: usize) {
        self.spinner.set_message(format!("Inserted {total} entries"));
    }

    fn done(&self, _summary: &LoadSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
