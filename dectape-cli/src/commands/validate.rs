use super::open_tape;
use crate::Outcome;
use anyhow::{Context, Result};
use colored::*;
use dectape_core::{listing::summary_line, TapeReader, Termination};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn execute(tape: &Path) -> Result<Outcome> {
    validate_to(tape, io::stdout().lock())
}

/// Read `tape` through and print a verdict to `out`
pub fn validate_to<W: Write>(tape: &Path, mut out: W) -> Result<Outcome> {
    info!("Validating tape file: {}", tape.display());
    let reader = open_tape(tape)?;
    let summary = TapeReader::new(reader)
        .scan()
        .with_context(|| format!("Failed to read tape file: {}", tape.display()))?;

    match &summary.volume {
        Some(volume) => writeln!(out, "Volume:  '{}'", volume.owner_name)?,
        None => writeln!(out, "Volume:  {}", "no volume header".yellow())?,
    }
    writeln!(out, "{}", summary_line(&summary))?;

    for warning in &summary.warnings {
        writeln!(out, "{} {}", "!".yellow(), warning)?;
    }

    let outcome = match summary.termination {
        Termination::Clean { end_offset } => {
            if summary.warnings.is_empty() {
                writeln!(out, "{} {}", "✓".green(), "TAPE VALIDATED".green())?;
            } else {
                writeln!(
                    out,
                    "{} TAPE VALIDATED with {} warning(s)",
                    "!".yellow(),
                    summary.warnings.len()
                )?;
            }
            info!("Logical end of tape at offset {}", end_offset);
            Outcome::Success
        }
        Termination::UnexpectedEnd { offset } => {
            let file = summary.files.last().map(|f| f.name()).unwrap_or_default();
            writeln!(
                out,
                "{} {} at offset {} (missing EOF record for \"{}\")",
                "✗".red(),
                "UNEXPECTED END OF TAPE".red(),
                offset,
                file
            )?;
            Outcome::UnexpectedEnd
        }
    };

    Ok(outcome)
}
