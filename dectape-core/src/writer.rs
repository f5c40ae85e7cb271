//! Tape initialization and file append
//!
//! A [`TapeWriter`] session owns the tape stream, the logical end of the
//! tape and the file sequence counter. Files are written as
//!
//! ```text
//! HDR1 record, data marker, data records..., data marker, EOF1 record, data marker
//! ```
//!
//! and the end-of-tape sentinel pair is written once, by [`TapeWriter::finish`].

use crate::constants::{
    END_OF_TAPE, FRAMED_RECORD_SIZE, MARKER_SIZE, MAX_BLOCK_COUNT, MIN_TAPE_SIZE, RECORD_SIZE,
};
use crate::date::RtDate;
use crate::error::TapeError;
use crate::header::{FileLabel, VolumeHeader};
use crate::reader::{TapeReader, Termination};
use crate::record::{write_data_marker, write_record, Block};
use crate::Result;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

#[cfg(feature = "logging")]
use tracing::{debug, info};

/// Write a blank tape: a volume header labelled `label`, then zero fill up
/// to `size` bytes rounded up to whole blocks (never less than
/// [`MIN_TAPE_SIZE`]). Returns the image size.
pub fn initialize_tape<W: Write>(writer: &mut W, label: &str, size: u64) -> Result<u64> {
    let block = RECORD_SIZE as u64;
    let total = size.max(MIN_TAPE_SIZE).div_ceil(block) * block;

    write_record(writer, &VolumeHeader::new(label).encode())?;

    let zeros = [0u8; RECORD_SIZE];
    let mut remaining = total - FRAMED_RECORD_SIZE as u64;
    while remaining > 0 {
        let chunk = remaining.min(block) as usize;
        writer.write_all(&zeros[..chunk])?;
        remaining -= chunk as u64;
    }
    writer.flush()?;

    #[cfg(feature = "logging")]
    info!("Initialized tape \"{}\" ({} bytes)", label, total);

    Ok(total)
}

/// A file written by [`TapeWriter::append_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedFile {
    /// Identifier as written to the labels
    pub name: String,
    /// Position on tape
    pub sequence: u32,
    /// Data blocks written
    pub blocks: u32,
    /// Offset of the header record
    pub offset: u64,
}

/// Append session over a tape image
pub struct TapeWriter<W: Write + Seek> {
    inner: W,
    end: u64,
    sequence: u32,
    poisoned: bool,
}

impl<W: Write + Seek> TapeWriter<W> {
    /// Initialize a blank tape at the start of `inner` and start a session
    /// positioned right after the volume header
    pub fn initialize(mut inner: W, label: &str, size: u64) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        initialize_tape(&mut inner, label, size)?;
        Self::resume(inner, FRAMED_RECORD_SIZE as u64, 0)
    }

    /// Continue a tape whose logical end is at `end_offset` and which
    /// already holds `files` files
    pub fn resume(mut inner: W, end_offset: u64, files: u32) -> Result<Self> {
        inner.seek(SeekFrom::Start(end_offset))?;
        Ok(Self {
            inner,
            end: end_offset,
            sequence: files,
            poisoned: false,
        })
    }

    /// Files on tape, including those appended in this session
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Offset where the next file will start
    pub fn end_offset(&self) -> u64 {
        self.end
    }

    /// Append one file read from `source`.
    ///
    /// On failure the tape is left as far as it got and the session refuses
    /// further appends.
    pub fn append_file<R: Read>(
        &mut self,
        name: &str,
        created: RtDate,
        source: R,
    ) -> Result<AppendedFile> {
        if self.poisoned {
            return Err(TapeError::WriterPoisoned);
        }
        let result = self.write_file(name, created, source);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn write_file<R: Read>(
        &mut self,
        name: &str,
        created: RtDate,
        mut source: R,
    ) -> Result<AppendedFile> {
        let sequence = self.sequence + 1;
        let header = FileLabel::header(name, sequence, created);
        let offset = self.end;

        self.inner.seek(SeekFrom::Start(offset))?;
        write_record(&mut self.inner, &header.encode())?;
        write_data_marker(&mut self.inner)?;

        let mut blocks: u32 = 0;
        let mut block: Block = [0u8; RECORD_SIZE];
        loop {
            block.fill(0);
            let len = read_block(&mut source, &mut block)?;
            if len == 0 {
                break;
            }
            if blocks == MAX_BLOCK_COUNT {
                return Err(TapeError::FileTooLarge(u64::from(blocks) + 1));
            }
            write_record(&mut self.inner, &block)?;
            blocks += 1;
            if len < RECORD_SIZE {
                break;
            }
        }

        write_data_marker(&mut self.inner)?;
        write_record(&mut self.inner, &header.trailer(blocks).encode())?;
        write_data_marker(&mut self.inner)?;

        self.end = offset
            + (FRAMED_RECORD_SIZE as u64) * (2 + u64::from(blocks))
            + 3 * MARKER_SIZE as u64;
        self.sequence = sequence;

        #[cfg(feature = "logging")]
        debug!(
            "Appended \"{}\" as file {} ({} blocks) at offset {}",
            header.name(),
            sequence,
            blocks,
            offset
        );

        Ok(AppendedFile {
            name: header.name(),
            sequence,
            blocks,
            offset,
        })
    }

    /// Terminate the tape with the end-of-tape sentinels and flush.
    ///
    /// Dropping a session without finishing it leaves whatever follows the
    /// last file unchanged, which on an initialized image is zero fill.
    pub fn finish(mut self) -> Result<W> {
        if self.poisoned {
            return Err(TapeError::WriterPoisoned);
        }
        self.inner.seek(SeekFrom::Start(self.end))?;
        self.inner.write_all(END_OF_TAPE)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Read + Write + Seek> TapeWriter<W> {
    /// Start a session at the end of an existing tape.
    ///
    /// The tape is read from the start to find its logical end and file
    /// count; a tape that ends inside a file cannot be appended to.
    pub fn open_append(mut inner: W) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        let summary = TapeReader::new(&mut inner).scan()?;
        match summary.termination {
            Termination::Clean { end_offset } => {
                Self::resume(inner, end_offset, summary.files.len() as u32)
            }
            Termination::UnexpectedEnd { offset } => Err(TapeError::NotAppendable(format!(
                "tape ends inside a file at offset {offset}"
            ))),
        }
    }
}

/// Read up to one block, stopping early only at end of input
fn read_block<R: Read>(source: &mut R, block: &mut Block) -> Result<usize> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        match source.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
