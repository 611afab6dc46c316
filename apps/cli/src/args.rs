//! Command-line argument parsing and validation.
//!
//! Help, version, and every usage error go to stderr so that stdout only
//! ever carries the load summary.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use kbload_shared::LoadRequest;

/// kbload — load `key --- value` lines into a knowledge base.
#[derive(Debug, Parser)]
#[command(
    name = "kbload",
    version,
    about = "Load a delimited key/value file into a knowledge base.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Source file with one `key --- value` mapping per line.
    #[arg(value_name = "KB-FILE")]
    pub kb_file: Option<OsString>,

    /// Knowledge base to create or update.
    #[arg(value_name = "KB-NAME")]
    pub kb_name: Option<String>,

    /// Additional positional arguments are accepted and ignored.
    #[arg(hide = true)]
    #[allow(dead_code)]
    pub rest: Vec<OsString>,

    /// Description stored on the knowledge base.
    #[arg(short, long, value_name = "DESCRIPTION")]
    pub description: Option<String>,

    /// Database file (overrides the config file).
    #[arg(long, env = "KBLOAD_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (defaults to ~/.kbload/kbload.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Errors detected after option parsing, before anything is loaded.
#[derive(Debug, thiserror::Error)]
pub(crate) enum UsageError {
    #[error("Missing kb-file or kb-name")]
    MissingArguments,

    #[error("Path to non-existing file: {}", .0.display())]
    MissingFile(PathBuf),
}

impl UsageError {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::MissingArguments | Self::MissingFile(_) => 1,
        }
    }

    /// Print the error and usage to stderr, then terminate.
    pub(crate) fn exit(&self) -> ! {
        eprintln!("{self}");
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(self.exit_code())
    }
}

/// Parse `args` (including the program name) or exit.
///
/// Help and version exit 0; any option error exits 2.
pub(crate) fn parse_cli<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).unwrap_or_else(|err| {
        eprint!("{}", err.render());
        std::process::exit(parse_exit_code(&err))
    })
}

fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 2,
    }
}

impl Cli {
    /// Validate positionals and build the load request.
    pub(crate) fn load_request(&self) -> Result<LoadRequest, UsageError> {
        let (Some(file_path), Some(name)) = (
            trimmed_path(self.kb_file.as_deref()),
            non_empty(self.kb_name.as_deref()),
        ) else {
            return Err(UsageError::MissingArguments);
        };

        if !file_path.is_file() {
            return Err(UsageError::MissingFile(file_path));
        }

        Ok(LoadRequest {
            file_path,
            kb_name: name.to_string(),
            description: self.description.clone().unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trim a path argument when it is valid UTF-8; other paths are used verbatim.
fn trimmed_path(value: Option<&OsStr>) -> Option<PathBuf> {
    let raw = value?;
    match raw.to_str() {
        Some(s) => non_empty(Some(s)).map(PathBuf::from),
        None => Some(PathBuf::from(raw)),
    }
}
