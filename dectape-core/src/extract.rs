//! Copying files off a tape
//!
//! Data blocks are written verbatim: the last block keeps its zero padding,
//! so an extracted file is always a whole number of 512-byte blocks.

use crate::constants::FILE_IDENTIFIER_LEN;
use crate::error::{TapeError, TapeWarning};
use crate::field::TextField;
use crate::header::FileHeader;
use crate::reader::{TapeFile, TapeVisitor};
use crate::record::Block;
use crate::Result;
use std::io::Write;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Where extracted files go
pub trait FileSink {
    /// Open `name` for writing; `None` skips the file
    fn create(&mut self, name: &str) -> Result<Option<Box<dyn Write>>>;

    /// Stamp a finished file with its creation date
    fn set_creation_date(&mut self, name: &str, year: i32, day_of_year: u32) -> Result<()>;
}

/// Host file name for a tape file identifier.
///
/// The base name runs up to the first space or `.`; a `.` inside the field
/// brings along at most 3 extension characters. Names that are empty or
/// could escape the output directory fail with [`TapeError::InvalidName`].
pub fn output_name(identifier: &TextField<FILE_IDENTIFIER_LEN>) -> Result<String> {
    let field = identifier.as_bytes();
    let base_end = field
        .iter()
        .position(|&b| b <= b' ' || b == b'.')
        .unwrap_or(field.len());
    let mut name = field[..base_end].to_vec();

    if let Some(dot) = field[base_end..].iter().position(|&b| b == b'.') {
        let ext = &field[base_end + dot..];
        let ext_end = ext[1..]
            .iter()
            .position(|&b| b <= b' ')
            .map_or(ext.len(), |i| i + 1);
        name.extend_from_slice(&ext[..ext_end.min(4)]);
    }

    let invalid = || TapeError::InvalidName(identifier.to_string_lossy());
    let name = String::from_utf8(name).map_err(|_| invalid())?;
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0')
    {
        return Err(invalid());
    }
    Ok(name)
}

struct Current {
    name: String,
    out: Box<dyn Write>,
}

/// Visitor that writes each file's data blocks through a [`FileSink`]
pub struct Extractor<S> {
    sink: S,
    current: Option<Current>,
    extracted: Vec<String>,
    skipped: Vec<TapeWarning>,
}

impl<S: FileSink> Extractor<S> {
    /// Extract into `sink`
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
            extracted: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Host names of the files written so far
    pub fn extracted(&self) -> &[String] {
        &self.extracted
    }

    /// Files that were not written, with the reason
    pub fn skipped(&self) -> &[TapeWarning] {
        &self.skipped
    }

    /// Give back the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn skip(&mut self, header: &FileHeader, reason: &str) {
        let warning = TapeWarning::Skipped {
            file: header.name(),
            reason: reason.to_string(),
        };
        #[cfg(feature = "logging")]
        warn!("{}", warning);
        self.skipped.push(warning);
    }
}

impl<S: FileSink> TapeVisitor for Extractor<S> {
    fn begin_file(&mut self, header: &FileHeader, _sequence: u32) -> Result<()> {
        let name = match output_name(&header.file_identifier) {
            Ok(name) => name,
            Err(err @ TapeError::InvalidName(_)) => {
                self.skip(header, &err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        match self.sink.create(&name)? {
            Some(out) => {
                #[cfg(feature = "logging")]
                debug!("Extracting \"{}\" to {}", header.name(), name);
                self.current = Some(Current { name, out });
            }
            None => self.skip(header, "output file exists and was not overwritten"),
        }
        Ok(())
    }

    fn data_block(&mut self, block: &Block) -> Result<()> {
        if let Some(current) = self.current.as_mut() {
            current.out.write_all(block)?;
        }
        Ok(())
    }

    fn end_file(&mut self, file: &TapeFile) -> Result<()> {
        let Some(mut current) = self.current.take() else {
            return Ok(());
        };
        current.out.flush()?;
        drop(current.out);

        let (year, day_of_year) = file.header.creation_date.year_and_day();
        self.sink
            .set_creation_date(&current.name, year, day_of_year)?;
        self.extracted.push(current.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(identifier: &str) -> Option<String> {
        output_name(&TextField::new(identifier)).ok()
    }

    #[test]
    fn test_output_name_6_3() {
        assert_eq!(name_of("HELLO.TXT").as_deref(), Some("HELLO.TXT"));
        assert_eq!(name_of("SWAP.SYS").as_deref(), Some("SWAP.SYS"));
        assert_eq!(name_of("README").as_deref(), Some("README"));
    }

    #[test]
    fn test_output_name_truncates_extension() {
        assert_eq!(name_of("LONGNAME.TEXT").as_deref(), Some("LONGNAME.TEX"));
        assert_eq!(name_of("A.B C").as_deref(), Some("A.B"));
    }

    #[test]
    fn test_output_name_rejects_unsafe() {
        assert_eq!(name_of(""), None);
        assert_eq!(name_of(".."), None);
        assert_eq!(name_of("A/B.TXT"), None);
        assert!(matches!(
            output_name(&TextField::from_bytes([0; 17])),
            Err(TapeError::InvalidName(_))
        ));
    }
}
