use super::confirm_replace;
use crate::{CliError, Options, Outcome, MEGABYTE};
use anyhow::{Context, Result};
use dectape_core::{
    fsio::{file_size, list_entries, modification_date, EntryInfo},
    header::rt11_name,
    RtDate, TapeWriter,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Regular files matching `dir`, sorted by name, leaving out the tape itself
fn source_files(dir: &Path, tape: &Path) -> Result<Vec<EntryInfo>> {
    let tape = fs::canonicalize(tape).ok();
    let is_tape = |info: &EntryInfo| {
        tape.is_some() && fs::canonicalize(&info.path).ok() == tape
    };

    let mut files = list_entries(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter(|entry| !matches!(entry, Ok(info) if info.is_directory))
        .collect::<dectape_core::Result<Vec<_>>>()?;
    files.retain(|info| {
        if is_tape(info) {
            info!("Skipping {}: it is the tape being written", info.path.display());
            return false;
        }
        true
    });
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn open_error(tape: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::OpenTape {
        path: tape.to_path_buf(),
        source,
    }
}

pub fn execute(dir: &Path, tape: &Path, options: &Options) -> Result<Outcome> {
    let sources = source_files(dir, tape)?;
    info!(
        "Writing {} file(s) from {} to {}",
        sources.len(),
        dir.display(),
        tape.display()
    );

    let mut writer = if options.append {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(tape)
            .map_err(open_error(tape))?;
        TapeWriter::open_append(file)
            .with_context(|| format!("Failed to append to tape file: {}", tape.display()))?
    } else {
        confirm_replace(tape, options)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(tape)
            .map_err(open_error(tape))?;
        TapeWriter::initialize(file, &options.label, options.size_mb * MEGABYTE)
            .with_context(|| format!("Failed to initialize tape file: {}", tape.display()))?
    };

    let progress = ProgressBar::new(sources.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    for entry in &sources {
        let name = rt11_name(&entry.name);
        progress.set_message(name.clone());

        let (year, day_of_year) = modification_date(&entry.path)
            .with_context(|| format!("Failed to stat \"{}\"", entry.path.display()))?;
        let source = File::open(&entry.path)
            .with_context(|| format!("Failed to open \"{}\"", entry.path.display()))?;

        let appended = writer
            .append_file(&name, RtDate::new(year, day_of_year), BufReader::new(source))
            .with_context(|| format!("Failed to write \"{}\" to tape", entry.name))?;
        debug!(
            "{} ({} bytes) -> {} (file {}, {} blocks)",
            entry.name,
            file_size(&entry.path).unwrap_or_default(),
            appended.name,
            appended.sequence,
            appended.blocks
        );
        progress.inc(1);
    }
    progress.finish_and_clear();

    let files = writer.sequence();
    writer
        .finish()
        .with_context(|| format!("Failed to finish tape file: {}", tape.display()))?;

    println!(
        "Wrote {} file(s) to \"{}\" ({} on tape)",
        sources.len(),
        tape.display(),
        files
    );
    Ok(Outcome::Success)
}
