//! Directory listing of a tape

use crate::header::{FileHeader, VolumeHeader};
use crate::reader::{TapeFile, TapeSummary, TapeVisitor, Termination};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Column headings printed before the first file
pub const COLUMN_HEADINGS: &str = "  FILE NAME         CREATE DATE  BLOCKS  TOTAL BYTES\n  \
                                   ================  ===========  ======  ===========";

/// One line of a tape directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Position on tape, starting at 1
    pub sequence: u32,
    /// Trimmed file identifier
    pub name: String,
    /// Creation date as `DD-Mon-YY`
    pub created: String,
    /// Data blocks read
    pub blocks: u32,
    /// Bytes in those blocks
    pub bytes: u64,
    /// Whether an EOF record closed the file
    pub complete: bool,
}

impl From<&TapeFile> for DirectoryEntry {
    fn from(file: &TapeFile) -> Self {
        Self {
            sequence: file.sequence,
            name: file.name(),
            created: file.header.creation_date.to_string(),
            blocks: file.blocks,
            bytes: file.bytes(),
            complete: file.trailer.is_some(),
        }
    }
}

impl DirectoryEntry {
    /// Fixed-column directory line
    pub fn line(&self) -> String {
        format!(
            "  {:<17.17}  {:<9.9}  {:>6}  {:>11}",
            self.name, self.created, self.blocks, self.bytes
        )
    }
}

/// Volume banner line
pub fn volume_line(volume: &VolumeHeader) -> String {
    format!(
        "RT11 TAPE  '{}' '{}' V{} Label V{}",
        volume.owner_identifier,
        volume.owner_name,
        char::from(volume.dec_standard_version),
        char::from(volume.label_standard_version)
    )
}

/// Closing line with the volume totals
pub fn summary_line(summary: &TapeSummary) -> String {
    let files = summary.files.len();
    format!(
        "  {} file{}, {} blocks, {} bytes",
        files,
        if files == 1 { "" } else { "s" },
        summary.total_blocks(),
        summary.total_bytes()
    )
}

/// Directory entries for every file of a finished pass
pub fn entries(summary: &TapeSummary) -> Vec<DirectoryEntry> {
    summary.files.iter().map(DirectoryEntry::from).collect()
}

/// Visitor that prints the tape directory as it is read
pub struct Lister<W> {
    out: W,
}

impl<W: Write> Lister<W> {
    /// Print to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the output
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TapeVisitor for Lister<W> {
    fn volume(&mut self, volume: Option<&VolumeHeader>) -> Result<()> {
        match volume {
            Some(volume) => writeln!(self.out, "{}", volume_line(volume))?,
            None => writeln!(self.out, "** NO TAPE HEADER **")?,
        }
        Ok(())
    }

    fn begin_file(&mut self, _header: &FileHeader, sequence: u32) -> Result<()> {
        if sequence == 1 {
            writeln!(self.out, "{COLUMN_HEADINGS}")?;
        }
        Ok(())
    }

    fn end_file(&mut self, file: &TapeFile) -> Result<()> {
        writeln!(self.out, "{}", DirectoryEntry::from(file).line())?;
        Ok(())
    }

    fn end_of_tape(&mut self, summary: &TapeSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", summary_line(summary))?;
        if let Termination::UnexpectedEnd { .. } = summary.termination {
            writeln!(self.out, "unexpected (missing EOF record)")?;
        }
        writeln!(self.out, "\nEND OF TAPE\n")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::RtDate;
    use crate::header::FileLabel;

    fn file(blocks: u32) -> TapeFile {
        let header = FileLabel::header("HELLO.TXT", 1, RtDate::new(1990, 32));
        TapeFile {
            trailer: Some(header.trailer(blocks)),
            header,
            blocks,
            sequence: 1,
            offset: 520,
        }
    }

    #[test]
    fn test_entry_line_columns() {
        let line = DirectoryEntry::from(&file(2)).line();
        assert_eq!(
            line,
            "  HELLO.TXT          01-Feb-90       2         1024"
        );
    }

    #[test]
    fn test_volume_line() {
        let line = volume_line(&VolumeHeader::new("dectape"));
        assert_eq!(line, "RT11 TAPE  'D%B' 'dectape   ' V1 Label V3");
    }

    #[test]
    fn test_summary_line_totals() {
        let summary = TapeSummary {
            volume: None,
            files: vec![file(2), file(3)],
            warnings: Vec::new(),
            termination: Termination::Clean { end_offset: 0 },
        };
        assert_eq!(summary_line(&summary), "  2 files, 5 blocks, 2560 bytes");
    }
}
