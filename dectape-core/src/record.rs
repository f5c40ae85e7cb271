//! Record framing
//!
//! Every block on tape is framed as:
//! 1. Tape marker (4 bytes): `00 02 00 00`
//! 2. Payload (512 bytes)
//! 3. Tape marker (4 bytes), identical to the leading one
//!
//! A lone data marker (`00 00 00 00`) where a record could start separates
//! sections and marks the end of the tape.

use crate::constants::{
    DATA_MARKER, FRAMED_RECORD_SIZE, MARKER_SIZE, RECORD_SIZE, TAPE_MARKER,
};
use crate::error::{FramingReason, TapeError};
use crate::Result;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::{ErrorKind, Read, Write};

/// One 512-byte record payload
pub type Block = [u8; RECORD_SIZE];

/// What a single read at a record boundary produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A framed 512-byte record
    Data(Box<Block>),
    /// A data marker: end of a section, or end of tape
    EndOfTape,
}

impl Record {
    /// The payload, if this is a data record
    pub fn block(&self) -> Option<&Block> {
        match self {
            Record::Data(block) => Some(&**block),
            Record::EndOfTape => None,
        }
    }
}

/// Reads records from a byte stream, tracking the absolute offset so every
/// error can say where it happened
pub struct RecordReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> RecordReader<R> {
    /// Start reading at offset 0
    pub fn new(inner: R) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Start reading a stream already positioned at `offset`
    pub fn with_offset(inner: R, offset: u64) -> Self {
        Self { inner, offset }
    }

    /// Bytes consumed so far (plus the starting offset)
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read one record.
    ///
    /// A data marker yields [`Record::EndOfTape`] after consuming only its 4
    /// bytes. A tape marker must be followed by a full payload and a matching
    /// trailing marker.
    pub fn read_record(&mut self) -> Result<Record> {
        let start = self.offset;
        let mut marker = [0u8; MARKER_SIZE];
        if self.fill(&mut marker)? < MARKER_SIZE {
            return Err(framing(start, FramingReason::ShortMarker));
        }

        if &marker == DATA_MARKER {
            return Ok(Record::EndOfTape);
        }
        if &marker != TAPE_MARKER {
            return Err(TapeError::UnknownMarker {
                offset: start,
                marker,
            });
        }

        let mut block = Box::new([0u8; RECORD_SIZE]);
        let payload_at = self.offset;
        if self.fill(&mut block[..])? < RECORD_SIZE {
            return Err(framing(payload_at, FramingReason::ShortPayload));
        }

        let trailer_at = self.offset;
        if self.fill(&mut marker)? < MARKER_SIZE {
            return Err(framing(trailer_at, FramingReason::ShortTrailer));
        }
        if &marker != TAPE_MARKER {
            return Err(framing(trailer_at, FramingReason::TrailerMismatch(marker)));
        }

        Ok(Record::Data(block))
    }

    /// Consume a standalone data marker; anything else is an error naming
    /// `file`
    pub fn read_data_marker(&mut self, file: &str) -> Result<()> {
        let start = self.offset;
        let mut marker = [0u8; MARKER_SIZE];
        if self.fill(&mut marker)? < MARKER_SIZE || &marker != DATA_MARKER {
            return Err(TapeError::MissingDataMarker {
                offset: start,
                file: file.to_string(),
            });
        }
        Ok(())
    }

    /// Read until `buf` is full or the stream ends; returns bytes read
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }
}

fn framing(offset: u64, reason: FramingReason) -> TapeError {
    TapeError::Framing { offset, reason }
}

/// Read one record from a stream; offsets in errors are relative to the
/// stream's current position
pub fn read_record<R: Read>(reader: &mut R) -> Result<Record> {
    RecordReader::new(reader).read_record()
}

/// Decode the record at the start of `data`, returning it with the number of
/// bytes consumed (4 for a data marker, 520 for a framed record)
pub fn decode_record(data: &[u8]) -> Result<(Record, usize)> {
    let mut reader = RecordReader::new(data);
    let record = reader.read_record()?;
    Ok((record, reader.offset() as usize))
}

/// Frame a payload as marker + payload + marker
pub fn encode_record(payload: &Block) -> Bytes {
    let mut buf = BytesMut::with_capacity(FRAMED_RECORD_SIZE);
    buf.put_slice(TAPE_MARKER);
    buf.put_slice(payload);
    buf.put_slice(TAPE_MARKER);
    buf.freeze()
}

/// Write one framed record
pub fn write_record<W: Write>(writer: &mut W, payload: &Block) -> Result<()> {
    writer.write_all(&encode_record(payload))?;
    Ok(())
}

/// Write a standalone data marker
pub fn write_data_marker<W: Write>(writer: &mut W) -> Result<()> {
    writer.write_all(DATA_MARKER)?;
    Ok(())
}
