//! # dectape Core
//!
//! Reading and writing RT-11 DECtape container images: 512-byte records
//! framed by 4-byte markers, grouped into a volume header and a series of
//! file header / data / trailer units.
//!
//! ## Modules
//!
//! - `constants`: Marker values, label identifiers and sizes
//! - `record`: Record framing (marker + payload + marker)
//! - `field`: Fixed-width, space-padded label fields
//! - `header`: Volume header and file header/trailer labels
//! - `date`: Packed label dates
//! - `reader`: Single-pass tape reader and its visitor interface
//! - `listing`: Directory listing
//! - `extract`: Copying files off a tape
//! - `writer`: Tape initialization and file append
//! - `fsio`: Host filesystem collaborators

#![warn(missing_docs)]

pub mod constants;
pub mod date;
pub mod error;
pub mod extract;
pub mod field;
pub mod fsio;
pub mod header;
pub mod listing;
pub mod reader;
pub mod record;
pub mod writer;

// Re-export commonly used types
pub use date::RtDate;
pub use error::{TapeError, TapeWarning};
pub use header::{FileHeader, FileLabel, FileTrailer, VolumeHeader};
pub use reader::{TapeReader, TapeSummary, TapeVisitor, Termination};
pub use record::{Block, Record};
pub use writer::TapeWriter;

/// Result type alias for tape operations
pub type Result<T> = core::result::Result<T, TapeError>;
