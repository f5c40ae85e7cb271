//! Constants for the RT-11 DECtape container format

/// Size of every record payload on tape
pub const RECORD_SIZE: usize = 512;

/// Size of a leading or trailing marker
pub const MARKER_SIZE: usize = 4;

/// Bytes consumed by one framed record (marker + payload + marker)
pub const FRAMED_RECORD_SIZE: usize = MARKER_SIZE + RECORD_SIZE + MARKER_SIZE;

/// Marker framing a real 512-byte record
pub const TAPE_MARKER: &[u8; MARKER_SIZE] = b"\x00\x02\x00\x00";

/// Standalone sentinel between sections and at end of tape
pub const DATA_MARKER: &[u8; MARKER_SIZE] = b"\x00\x00\x00\x00";

/// Two consecutive data markers terminate the tape
pub const END_OF_TAPE: &[u8; 2 * MARKER_SIZE] = &[0u8; 2 * MARKER_SIZE];

/// Smallest image `initialize` will produce: the volume record followed by
/// enough zero fill to round up to two blocks
pub const MIN_TAPE_SIZE: u64 = 2 * RECORD_SIZE as u64;

/// Label identifier of the volume header
pub const VOLUME_LABEL: &[u8; 3] = b"VOL";

/// Label identifier of a file header
pub const HEADER_LABEL: &[u8; 3] = b"HDR";

/// Label identifier of a file trailer
pub const TRAILER_LABEL: &[u8; 3] = b"EOF";

/// Label number carried by every supported label
pub const LABEL_NUMBER: u8 = b'1';

/// Volume identifier written by `initialize`
pub const VOLUME_IDENTIFIER: &str = "RT11A ";

/// Owner identifier meaning "written by a DEC PDP-11"
pub const OWNER_IDENTIFIER: &str = "D%B";

/// Default owner name (tape label) for new tapes
pub const DEFAULT_TAPE_LABEL: &str = "dectape";

/// DEC standard version written into new volume headers
pub const DEC_STANDARD_VERSION: u8 = b'1';

/// Label standard version written into new volume headers
pub const LABEL_STANDARD_VERSION: u8 = b'3';

/// File-set identifier written into file labels
pub const FILE_SET_IDENTIFIER: &str = "RT11A ";

/// The only supported system code
pub const SYSTEM_CODE: &str = "DECRT11A     ";

/// Width of the file identifier field
pub const FILE_IDENTIFIER_LEN: usize = 17;

/// Largest block count the 6-digit field can carry
pub const MAX_BLOCK_COUNT: u32 = 999_999;
