//! Error types for tape operations

use thiserror::Error;

/// Errors that abort a read pass or a write operation
#[derive(Debug, Error)]
pub enum TapeError {
    /// A record ended short or its trailing marker did not match
    #[error("Framing error at offset {offset}: {reason}")]
    Framing {
        /// Byte offset where the anomaly was detected
        offset: u64,
        /// What went wrong
        reason: FramingReason,
    },

    /// A leading marker was neither a tape marker nor a data marker
    #[error("Unknown marker {marker:02x?} at offset {offset}")]
    UnknownMarker {
        /// Byte offset of the marker
        offset: u64,
        /// The bytes found
        marker: [u8; 4],
    },

    /// A standalone data marker was required but something else was found
    #[error("Missing data marker at offset {offset} (file \"{file}\")")]
    MissingDataMarker {
        /// Byte offset where the marker was expected
        offset: u64,
        /// Identifier of the file being read
        file: String,
    },

    /// A record's label did not match what the current position requires
    #[error("Invalid {expected} label at offset {offset}: found \"{found}\"")]
    LabelMismatch {
        /// Byte offset of the record
        offset: u64,
        /// Expected label identifier
        expected: &'static str,
        /// Label identifier and number found
        found: String,
    },

    /// The tape ended before a volume or file header could be read
    #[error("Tape is empty: no volume or file header found")]
    EmptyTape,

    /// The tape cannot be appended to
    #[error("Tape cannot be appended to: {0}")]
    NotAppendable(String),

    /// A previous write failed; the image must not be reused in this session
    #[error("Tape writer is unusable after an earlier write failure")]
    WriterPoisoned,

    /// A source file needs more blocks than the block-count field can hold
    #[error("File needs {0} blocks, more than the tape label can record")]
    FileTooLarge(u64),

    /// A file identifier cannot be turned into an output file name
    #[error("Invalid file name \"{0}\"")]
    InvalidName(String),

    /// The user refused an overwrite or initialize confirmation
    #[error("Operation declined by user")]
    UserDeclined,

    /// Underlying storage failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a framed record could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingReason {
    /// The leading marker was cut short
    ShortMarker,
    /// The 512-byte payload was cut short
    ShortPayload,
    /// The trailing marker was cut short
    ShortTrailer,
    /// The trailing marker did not match the leading tape marker
    TrailerMismatch([u8; 4]),
}

impl core::fmt::Display for FramingReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FramingReason::ShortMarker => write!(f, "short read of record marker"),
            FramingReason::ShortPayload => write!(f, "short read of record payload"),
            FramingReason::ShortTrailer => write!(f, "short read of trailing marker"),
            FramingReason::TrailerMismatch(found) => {
                write!(f, "trailing marker {found:02x?} does not match tape marker")
            }
        }
    }
}

impl TapeError {
    /// Process exit code for this error.
    ///
    /// Framing and label errors map to small negative codes, one per kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            TapeError::UserDeclined => 1,
            TapeError::Io(_) => -2,
            TapeError::UnknownMarker { .. } => -3,
            TapeError::Framing { .. } => -4,
            TapeError::WriterPoisoned | TapeError::NotAppendable(_) => -5,
            TapeError::FileTooLarge(_) | TapeError::InvalidName(_) => -6,
            TapeError::LabelMismatch { expected, .. } => match *expected {
                "VOL" => -8,
                "EOF" => -12,
                _ => -10,
            },
            TapeError::EmptyTape => -9,
            TapeError::MissingDataMarker { .. } => -11,
        }
    }

    /// True for errors caused by damaged or malformed tape content
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            TapeError::Framing { .. }
                | TapeError::UnknownMarker { .. }
                | TapeError::MissingDataMarker { .. }
                | TapeError::LabelMismatch { .. }
                | TapeError::EmptyTape
        )
    }
}

/// Non-fatal inconsistencies found while reading a tape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeWarning {
    /// A header's embedded sequence number disagrees with its position
    SequenceMismatch {
        /// Identifier of the file
        file: String,
        /// 1-based position of the file on tape
        expected: u32,
        /// Sequence number found in the header
        found: u32,
    },

    /// A trailer disagrees with its header or with the blocks read
    TrailerMismatch {
        /// Identifier from the header
        file: String,
        /// Identifier from the trailer
        trailer_file: String,
        /// Blocks actually read between header and trailer
        blocks_read: u32,
        /// Block count recorded in the trailer
        trailer_blocks: u32,
    },

    /// A file was not extracted
    Skipped {
        /// Identifier of the file
        file: String,
        /// Why it was skipped
        reason: String,
    },
}

impl core::fmt::Display for TapeWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TapeWarning::SequenceMismatch {
                file,
                expected,
                found,
            } => write!(
                f,
                "Invalid file seq number in header of \"{file}\" - {expected} vs {found}"
            ),
            TapeWarning::TrailerMismatch {
                file,
                trailer_file,
                blocks_read,
                trailer_blocks,
            } => write!(
                f,
                "EOF header mismatch for \"{file}\": trailer \"{trailer_file}\" \
                 records {trailer_blocks} blocks, {blocks_read} read"
            ),
            TapeWarning::Skipped { file, reason } => write!(f, "Skipped \"{file}\": {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_exit_codes() {
        let err = |expected| TapeError::LabelMismatch {
            offset: 0,
            expected,
            found: String::new(),
        };
        assert_eq!(err("VOL").exit_code(), -8);
        assert_eq!(err("HDR").exit_code(), -10);
        assert_eq!(err("EOF").exit_code(), -12);
    }

    #[test]
    fn test_framing_display_includes_offset() {
        let err = TapeError::Framing {
            offset: 1040,
            reason: FramingReason::TrailerMismatch([0, 3, 0, 0]),
        };
        let msg = err.to_string();
        assert!(msg.contains("1040"));
        assert!(msg.contains("trailing marker"));
        assert!(err.is_corruption());
    }
}
