use super::confirm_replace;
use crate::{CliError, Options, Outcome, MEGABYTE};
use anyhow::{Context, Result};
use dectape_core::writer::initialize_tape;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn execute(tape: &Path, options: &Options) -> Result<Outcome> {
    confirm_replace(tape, options)?;

    let file = File::create(tape).map_err(|source| CliError::OpenTape {
        path: tape.to_path_buf(),
        source,
    })?;
    let size = initialize_tape(
        &mut BufWriter::new(file),
        &options.label,
        options.size_mb * MEGABYTE,
    )
    .with_context(|| format!("Failed to initialize tape file: {}", tape.display()))?;

    println!(
        "Initialized \"{}\": label '{}', {} bytes",
        tape.display(),
        options.label,
        size
    );
    Ok(Outcome::Success)
}
