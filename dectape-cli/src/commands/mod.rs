//! One module per operation; each `execute` returns the [`Outcome`] that
//! decides the exit code.
//!
//! [`Outcome`]: crate::Outcome

pub mod extract;
pub mod init;
pub mod list;
pub mod validate;
pub mod write;

use crate::prompt::confirm_on_terminal;
use crate::{CliError, Options};
use anyhow::Result;
use dectape_core::TapeError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Open a tape image for reading
pub fn open_tape(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| CliError::OpenTape {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Check that an existing tape image at `path` may be replaced.
///
/// Fails with [`TapeError::UserDeclined`] when it may not.
pub fn confirm_replace(path: &Path, options: &Options) -> Result<()> {
    if !path.exists()
        || options.overwrite
        || (options.prompt && confirm_on_terminal("Overwrite existing file"))
    {
        return Ok(());
    }
    info!("Leaving {} unchanged", path.display());
    Err(TapeError::UserDeclined.into())
}
