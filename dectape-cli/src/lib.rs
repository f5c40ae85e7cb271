//! Library entry for dectape-cli used by integration tests and embedding.

pub mod commands;
pub mod prompt;

use dectape_core::{constants::DEFAULT_TAPE_LABEL, TapeError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bytes per megabyte for `-S`
pub const MEGABYTE: u64 = 1024 * 1024;

/// Errors raised by the command layer itself
#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that do not name a supported operation
    #[error("{0}")]
    Usage(String),

    /// The tape image could not be opened
    #[error("Unable to open tape file \"{}\"", path.display())]
    OpenTape {
        /// Tape image path
        path: PathBuf,
        /// Cause
        #[source]
        source: std::io::Error,
    },
}

/// How a command finished when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything went through
    Success,
    /// The tape ended inside a file
    UnexpectedEnd,
}

impl Outcome {
    /// Process exit code
    pub fn code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::UnexpectedEnd => 1,
        }
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<CliError>() {
        return match err {
            CliError::Usage(_) => 1,
            CliError::OpenTape { .. } => 2,
        };
    }
    match err.downcast_ref::<TapeError>() {
        Some(err) => err.exit_code(),
        None => -1,
    }
}

/// Settings shared by all operations
#[derive(Debug, Clone)]
pub struct Options {
    /// Replace existing files without asking
    pub overwrite: bool,
    /// Ask on the terminal before replacing files
    pub prompt: bool,
    /// Print the directory as JSON
    pub json: bool,
    /// Add to an existing tape instead of starting a new one
    pub append: bool,
    /// Size of a new tape in megabytes
    pub size_mb: u64,
    /// Owner name of a new tape
    pub label: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            overwrite: false,
            prompt: true,
            json: false,
            append: false,
            size_mb: 32,
            label: DEFAULT_TAPE_LABEL.to_string(),
        }
    }
}

/// What the positional arguments ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the directory of a tape
    List(PathBuf),
    /// Read a tape through without output beyond a verdict
    Validate(PathBuf),
    /// Copy the files of a tape into a directory
    Extract {
        /// Tape image
        tape: PathBuf,
        /// Existing output directory
        dir: PathBuf,
    },
    /// Copy the files of a directory onto a tape
    Write {
        /// Source directory, optionally ending in a wildcard
        dir: PathBuf,
        /// Tape image
        tape: PathBuf,
    },
    /// Create a blank tape
    Initialize(PathBuf),
}

fn is_source_dir(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }
    let has_wildcard = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains(['*', '?']));
    has_wildcard && path.parent().map_or(true, |p| p.as_os_str().is_empty() || p.is_dir())
}

/// Work out the operation from the positional arguments.
///
/// With two arguments, whichever one is a directory decides the direction.
pub fn resolve_mode(
    first: PathBuf,
    second: Option<PathBuf>,
    initialize: bool,
    validate: bool,
) -> Result<Mode, CliError> {
    match (second, initialize) {
        (Some(_), true) => Err(CliError::Usage(
            "Initialize does not take 2 parameters".to_string(),
        )),
        (None, true) => Ok(Mode::Initialize(first)),
        (None, false) if validate => Ok(Mode::Validate(first)),
        (None, false) => Ok(Mode::List(first)),
        (Some(second), false) => {
            if second.is_dir() && !first.is_dir() {
                Ok(Mode::Extract {
                    tape: first,
                    dir: second,
                })
            } else if is_source_dir(&first) && !second.is_dir() {
                Ok(Mode::Write {
                    dir: first,
                    tape: second,
                })
            } else {
                Err(CliError::Usage(
                    "operation not supported for specified files/paths".to_string(),
                ))
            }
        }
    }
}
