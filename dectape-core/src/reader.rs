//! Sequential tape reader
//!
//! The reader walks the tape once, front to back:
//!
//! ```text
//! ExpectVolumeOrFirstHeader -> ExpectFileHeader -> ExpectDataMarker
//!     -> ReadingDataBlocks -> ExpectTrailer -> ExpectTrailingDataMarker
//!     -> ExpectFileHeader ...
//! ```
//!
//! A data marker where a file header is expected ends the pass cleanly. A
//! data marker where a trailer is expected ends it with
//! [`Termination::UnexpectedEnd`]. Anything else out of place is returned as
//! an error and the pass stops there.
//!
//! What happens to each file is up to a [`TapeVisitor`]: listing,
//! extraction and validation are all visitors over the same pass.

use crate::constants::{RECORD_SIZE, VOLUME_LABEL};
use crate::error::{TapeError, TapeWarning};
use crate::header::{FileHeader, FileLabel, FileTrailer, LabelId, LabelKind, VolumeHeader};
use crate::record::{Block, Record, RecordReader};
use crate::Result;
use std::io::Read;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// The first record of a tape, resolved once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstRecord {
    /// A proper volume header
    Volume(VolumeHeader),
    /// No volume header; the tape starts with the first file's header
    File(FileHeader),
}

/// Classify the first record of a tape
pub fn resolve_first_record(block: &Block, offset: u64) -> Result<FirstRecord> {
    let label = LabelId::of(block);
    if label.identifier == *LabelKind::Header.identifier() {
        return Ok(FirstRecord::File(FileLabel::decode(block)));
    }
    if !label.is(VOLUME_LABEL) {
        return Err(label_mismatch(offset, "VOL", label));
    }
    Ok(FirstRecord::Volume(VolumeHeader::decode(block)))
}

/// A file found on tape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeFile {
    /// The file's header label
    pub header: FileHeader,
    /// The trailer, missing when the tape ended before it
    pub trailer: Option<FileTrailer>,
    /// Data blocks actually read
    pub blocks: u32,
    /// 1-based position on tape
    pub sequence: u32,
    /// Offset of the header record
    pub offset: u64,
}

impl TapeFile {
    /// Bytes occupied by the data blocks
    pub fn bytes(&self) -> u64 {
        u64::from(self.blocks) * RECORD_SIZE as u64
    }

    /// Trimmed file identifier
    pub fn name(&self) -> String {
        self.header.name()
    }
}

/// How a read pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// End-of-tape marker where a file header was expected
    Clean {
        /// Offset of that marker; new files are appended here
        end_offset: u64,
    },
    /// The tape ended where a trailer was expected
    UnexpectedEnd {
        /// Offset of the marker found instead of the trailer
        offset: u64,
    },
}

/// Everything learned from one pass over a tape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeSummary {
    /// The volume header, if the tape has one
    pub volume: Option<VolumeHeader>,
    /// Files in tape order
    pub files: Vec<TapeFile>,
    /// Non-fatal inconsistencies
    pub warnings: Vec<TapeWarning>,
    /// How the pass ended
    pub termination: Termination,
}

impl TapeSummary {
    /// True if the pass reached a proper end of tape
    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Clean { .. })
    }

    /// Data blocks across all files
    pub fn total_blocks(&self) -> u64 {
        self.files.iter().map(|f| u64::from(f.blocks)).sum()
    }

    /// Data bytes across all files
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(TapeFile::bytes).sum()
    }
}

/// Receives the structure of a tape as the reader walks it
pub trait TapeVisitor {
    /// Called once with the volume header, or `None` if the tape has none
    fn volume(&mut self, _volume: Option<&VolumeHeader>) -> Result<()> {
        Ok(())
    }

    /// Called once a file header and the data marker after it have been read
    fn begin_file(&mut self, _header: &FileHeader, _sequence: u32) -> Result<()> {
        Ok(())
    }

    /// Called for every data block of the current file, in order
    fn data_block(&mut self, _block: &Block) -> Result<()> {
        Ok(())
    }

    /// Called when the data section of a file has ended
    fn end_file(&mut self, _file: &TapeFile) -> Result<()> {
        Ok(())
    }

    /// Called once when the pass ends without error
    fn end_of_tape(&mut self, _summary: &TapeSummary) -> Result<()> {
        Ok(())
    }
}

/// The no-op visitor, for validation passes
impl TapeVisitor for () {}

impl<V: TapeVisitor + ?Sized> TapeVisitor for &mut V {
    fn volume(&mut self, volume: Option<&VolumeHeader>) -> Result<()> {
        (**self).volume(volume)
    }

    fn begin_file(&mut self, header: &FileHeader, sequence: u32) -> Result<()> {
        (**self).begin_file(header, sequence)
    }

    fn data_block(&mut self, block: &Block) -> Result<()> {
        (**self).data_block(block)
    }

    fn end_file(&mut self, file: &TapeFile) -> Result<()> {
        (**self).end_file(file)
    }

    fn end_of_tape(&mut self, summary: &TapeSummary) -> Result<()> {
        (**self).end_of_tape(summary)
    }
}

/// Both visitors see every event, first `A` then `B`
impl<A: TapeVisitor, B: TapeVisitor> TapeVisitor for (A, B) {
    fn volume(&mut self, volume: Option<&VolumeHeader>) -> Result<()> {
        self.0.volume(volume)?;
        self.1.volume(volume)
    }

    fn begin_file(&mut self, header: &FileHeader, sequence: u32) -> Result<()> {
        self.0.begin_file(header, sequence)?;
        self.1.begin_file(header, sequence)
    }

    fn data_block(&mut self, block: &Block) -> Result<()> {
        self.0.data_block(block)?;
        self.1.data_block(block)
    }

    fn end_file(&mut self, file: &TapeFile) -> Result<()> {
        self.0.end_file(file)?;
        self.1.end_file(file)
    }

    fn end_of_tape(&mut self, summary: &TapeSummary) -> Result<()> {
        self.0.end_of_tape(summary)?;
        self.1.end_of_tape(summary)
    }
}

/// A file whose header has been read but whose trailer has not
#[derive(Debug)]
struct OpenFile {
    header: FileHeader,
    sequence: u32,
    offset: u64,
    blocks: u32,
}

impl OpenFile {
    fn close(self, trailer: Option<FileTrailer>) -> TapeFile {
        TapeFile {
            header: self.header,
            trailer,
            blocks: self.blocks,
            sequence: self.sequence,
            offset: self.offset,
        }
    }
}

#[derive(Debug)]
enum ReadState {
    ExpectVolumeOrFirstHeader,
    ExpectFileHeader,
    ExpectDataMarker(OpenFile),
    ReadingDataBlocks(OpenFile),
    ExpectTrailer(OpenFile),
    ExpectTrailingDataMarker(TapeFile),
    Done(Termination),
}

/// Single-pass reader over a tape image
pub struct TapeReader<R> {
    records: RecordReader<R>,
    volume: Option<VolumeHeader>,
    files: Vec<TapeFile>,
    warnings: Vec<TapeWarning>,
    sequence: u32,
}

impl<R: Read> TapeReader<R> {
    /// Read a tape from the start of `inner`
    pub fn new(inner: R) -> Self {
        Self {
            records: RecordReader::new(inner),
            volume: None,
            files: Vec::new(),
            warnings: Vec::new(),
            sequence: 0,
        }
    }

    /// Walk the whole tape without any output
    pub fn scan(self) -> Result<TapeSummary> {
        self.run(&mut ())
    }

    /// Walk the whole tape, reporting its structure to `visitor`
    pub fn run<V: TapeVisitor + ?Sized>(mut self, visitor: &mut V) -> Result<TapeSummary> {
        let mut state = ReadState::ExpectVolumeOrFirstHeader;
        loop {
            state = match state {
                ReadState::ExpectVolumeOrFirstHeader => self.read_first_record(visitor)?,
                ReadState::ExpectFileHeader => self.read_file_header(visitor)?,
                ReadState::ExpectDataMarker(file) => {
                    self.records.read_data_marker(&file.header.name())?;
                    visitor.begin_file(&file.header, file.sequence)?;
                    ReadState::ReadingDataBlocks(file)
                }
                ReadState::ReadingDataBlocks(mut file) => match self.records.read_record()? {
                    Record::Data(block) => {
                        visitor.data_block(&block)?;
                        file.blocks += 1;
                        ReadState::ReadingDataBlocks(file)
                    }
                    Record::EndOfTape => ReadState::ExpectTrailer(file),
                },
                ReadState::ExpectTrailer(file) => self.read_trailer(file, visitor)?,
                ReadState::ExpectTrailingDataMarker(file) => {
                    self.records.read_data_marker(&file.name())?;
                    self.files.push(file);
                    ReadState::ExpectFileHeader
                }
                ReadState::Done(termination) => {
                    let summary = TapeSummary {
                        volume: self.volume,
                        files: self.files,
                        warnings: self.warnings,
                        termination,
                    };
                    visitor.end_of_tape(&summary)?;
                    return Ok(summary);
                }
            };
        }
    }

    fn read_first_record<V: TapeVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<ReadState> {
        let offset = self.records.offset();
        let block = match self.records.read_record()? {
            Record::Data(block) => block,
            Record::EndOfTape => return Err(TapeError::EmptyTape),
        };

        match resolve_first_record(&block, offset)? {
            FirstRecord::Volume(volume) => {
                #[cfg(feature = "logging")]
                debug!(
                    "Volume header: owner '{}' label '{}'",
                    volume.owner_identifier, volume.owner_name
                );
                visitor.volume(Some(&volume))?;
                self.volume = Some(volume);
                Ok(ReadState::ExpectFileHeader)
            }
            FirstRecord::File(header) => {
                #[cfg(feature = "logging")]
                warn!("No volume header, tape starts with file \"{}\"", header.name());
                visitor.volume(None)?;
                self.begin_file(header, offset, visitor)
            }
        }
    }

    fn read_file_header<V: TapeVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<ReadState> {
        let offset = self.records.offset();
        match self.records.read_record()? {
            Record::EndOfTape => {
                #[cfg(feature = "logging")]
                debug!("End of tape at offset {}", offset);
                Ok(ReadState::Done(Termination::Clean { end_offset: offset }))
            }
            Record::Data(block) => {
                let header = FileLabel::decode(&block);
                if !header.is(LabelKind::Header) {
                    return Err(label_mismatch(offset, "HDR", header.label));
                }
                self.begin_file(header, offset, visitor)
            }
        }
    }

    fn begin_file<V: TapeVisitor + ?Sized>(
        &mut self,
        header: FileHeader,
        offset: u64,
        visitor: &mut V,
    ) -> Result<ReadState> {
        self.sequence += 1;
        let found = header.sequence();
        if found != self.sequence {
            self.warn(TapeWarning::SequenceMismatch {
                file: header.name(),
                expected: self.sequence,
                found,
            });
        }

        #[cfg(feature = "logging")]
        debug!(
            "File {} \"{}\" at offset {}",
            self.sequence,
            header.name(),
            offset
        );

        Ok(ReadState::ExpectDataMarker(OpenFile {
            header,
            sequence: self.sequence,
            offset,
            blocks: 0,
        }))
    }

    fn read_trailer<V: TapeVisitor + ?Sized>(
        &mut self,
        file: OpenFile,
        visitor: &mut V,
    ) -> Result<ReadState> {
        let offset = self.records.offset();
        let block = match self.records.read_record()? {
            Record::Data(block) => block,
            Record::EndOfTape => {
                #[cfg(feature = "logging")]
                warn!(
                    "Unexpected end of tape at offset {}: \"{}\" has no EOF record",
                    offset,
                    file.header.name()
                );
                let file = file.close(None);
                visitor.end_file(&file)?;
                self.files.push(file);
                return Ok(ReadState::Done(Termination::UnexpectedEnd { offset }));
            }
        };

        let trailer = FileLabel::decode(&block);
        if !trailer.is(LabelKind::Trailer) {
            return Err(label_mismatch(offset, "EOF", trailer.label));
        }

        if trailer.file_identifier != file.header.file_identifier
            || trailer.blocks() != file.blocks
        {
            self.warn(TapeWarning::TrailerMismatch {
                file: file.header.name(),
                trailer_file: trailer.name(),
                blocks_read: file.blocks,
                trailer_blocks: trailer.blocks(),
            });
        }

        let file = file.close(Some(trailer));
        visitor.end_file(&file)?;
        Ok(ReadState::ExpectTrailingDataMarker(file))
    }

    fn warn(&mut self, warning: TapeWarning) {
        #[cfg(feature = "logging")]
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

fn label_mismatch(offset: u64, expected: &'static str, found: LabelId) -> TapeError {
    TapeError::LabelMismatch {
        offset,
        expected,
        found: found.to_string(),
    }
}

/// Scan a complete tape image held in memory
pub fn read_tape(data: &[u8]) -> Result<TapeSummary> {
    TapeReader::new(data).scan()
}
