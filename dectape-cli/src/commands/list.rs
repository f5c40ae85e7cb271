use super::open_tape;
use crate::Outcome;
use anyhow::{Context, Result};
use dectape_core::{
    listing::{entries, DirectoryEntry, Lister},
    TapeReader, TapeSummary,
};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Directory of a tape in JSON form
#[derive(Debug, Serialize, Deserialize)]
pub struct TapeDirectory {
    /// Owner name from the volume header
    pub label: Option<String>,
    /// Files in tape order
    pub files: Vec<DirectoryEntry>,
    /// Data blocks across all files
    pub total_blocks: u64,
    /// Data bytes across all files
    pub total_bytes: u64,
    /// Whether the tape ended properly
    pub complete: bool,
    /// Non-fatal inconsistencies
    pub warnings: Vec<String>,
}

impl From<&TapeSummary> for TapeDirectory {
    fn from(summary: &TapeSummary) -> Self {
        Self {
            label: summary
                .volume
                .as_ref()
                .map(|volume| volume.owner_name.to_string_lossy()),
            files: entries(summary),
            total_blocks: summary.total_blocks(),
            total_bytes: summary.total_bytes(),
            complete: summary.is_complete(),
            warnings: summary.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn execute(tape: &Path, json: bool) -> Result<Outcome> {
    list_to(tape, json, io::stdout().lock())
}

/// Print the directory of `tape` to `out`
pub fn list_to<W: Write>(tape: &Path, json: bool, mut out: W) -> Result<Outcome> {
    info!("Listing tape file: {}", tape.display());
    let reader = open_tape(tape)?;

    let summary = if json {
        let summary = TapeReader::new(reader)
            .scan()
            .with_context(|| format!("Failed to read tape file: {}", tape.display()))?;
        serde_json::to_writer_pretty(&mut out, &TapeDirectory::from(&summary))
            .context("Failed to write JSON directory")?;
        writeln!(out)?;
        summary
    } else {
        TapeReader::new(reader)
            .run(&mut Lister::new(&mut out))
            .with_context(|| format!("Failed to read tape file: {}", tape.display()))?
    };

    Ok(if summary.is_complete() {
        Outcome::Success
    } else {
        Outcome::UnexpectedEnd
    })
}
