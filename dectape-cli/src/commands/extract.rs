use super::open_tape;
use crate::prompt::confirm_on_terminal;
use crate::{Options, Outcome};
use anyhow::{Context, Result};
use dectape_core::{extract::Extractor, fsio::DirectorySink, listing::Lister, TapeReader};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn execute(tape: &Path, dir: &Path, options: &Options) -> Result<Outcome> {
    extract_to(tape, dir, options, io::stdout().lock())
}

/// Copy every file of `tape` into `dir`, printing the directory to `out`
/// along the way
pub fn extract_to<W: Write>(
    tape: &Path,
    dir: &Path,
    options: &Options,
    out: W,
) -> Result<Outcome> {
    info!("Extracting {} into {}", tape.display(), dir.display());
    let reader = open_tape(tape)?;

    let mut sink = DirectorySink::new(dir, options.overwrite);
    if options.prompt {
        sink = sink.with_confirm(Box::new(confirm_on_terminal));
    }

    let mut visitor = (Lister::new(out), Extractor::new(sink));
    let summary = TapeReader::new(reader)
        .run(&mut visitor)
        .with_context(|| format!("Failed to read tape file: {}", tape.display()))?;

    let extractor = visitor.1;
    info!(
        "Extracted {} file(s), skipped {}",
        extractor.extracted().len(),
        extractor.skipped().len()
    );

    Ok(if summary.is_complete() {
        Outcome::Success
    } else {
        Outcome::UnexpectedEnd
    })
}
