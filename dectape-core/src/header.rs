//! Volume header, file header and file trailer labels
//!
//! All three are 512-byte records. Decoding never fails: any 512 bytes
//! decode to a label, and checking the label identifier and number is left
//! to the reader.

use crate::constants::{
    DEC_STANDARD_VERSION, FILE_IDENTIFIER_LEN, FILE_SET_IDENTIFIER, HEADER_LABEL, LABEL_NUMBER,
    LABEL_STANDARD_VERSION, OWNER_IDENTIFIER, RECORD_SIZE, SYSTEM_CODE, TRAILER_LABEL,
    VOLUME_IDENTIFIER, VOLUME_LABEL,
};
use crate::date::RtDate;
use crate::field::TextField;
use crate::record::Block;

/// Label identifier and number shared by every label layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelId {
    /// `VOL`, `HDR` or `EOF`
    pub identifier: [u8; 3],
    /// Label number, `'1'` for every supported label
    pub number: u8,
}

impl LabelId {
    /// Read the label id from the start of any block
    pub fn of(block: &Block) -> Self {
        Self {
            identifier: [block[0], block[1], block[2]],
            number: block[3],
        }
    }

    /// True if this is `identifier` with label number `'1'`
    pub fn is(&self, identifier: &[u8; 3]) -> bool {
        &self.identifier == identifier && self.number == LABEL_NUMBER
    }
}

impl core::fmt::Display for LabelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}{}",
            String::from_utf8_lossy(&self.identifier),
            char::from(self.number)
        )
    }
}

/// The volume header, first record on a tape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeHeader {
    /// `VOL1`
    pub label: LabelId,
    /// Volume name, `RT11A ` on tapes written here
    pub volume_identifier: TextField<6>,
    /// Accessibility flag, normally a space
    pub accessibility: u8,
    /// `D%B` for tapes written by a PDP-11
    pub owner_identifier: TextField<3>,
    /// Owner name, used as the tape label
    pub owner_name: TextField<10>,
    /// DEC standard version, `'1'`
    pub dec_standard_version: u8,
    /// Label standard version, `'3'`
    pub label_standard_version: u8,
}

impl VolumeHeader {
    /// A fresh volume header carrying `label` as owner name
    pub fn new(label: &str) -> Self {
        Self {
            label: LabelId {
                identifier: *VOLUME_LABEL,
                number: LABEL_NUMBER,
            },
            volume_identifier: TextField::new(VOLUME_IDENTIFIER),
            accessibility: b' ',
            owner_identifier: TextField::new(OWNER_IDENTIFIER),
            owner_name: TextField::new(label),
            dec_standard_version: DEC_STANDARD_VERSION,
            label_standard_version: LABEL_STANDARD_VERSION,
        }
    }

    /// Decode from a 512-byte record
    pub fn decode(block: &Block) -> Self {
        Self {
            label: LabelId::of(block),
            volume_identifier: TextField::read(block, 4),
            accessibility: block[10],
            owner_identifier: TextField::read(block, 37),
            owner_name: TextField::read(block, 40),
            dec_standard_version: block[50],
            label_standard_version: block[79],
        }
    }

    /// Encode into a 512-byte record; unused bytes are spaces
    pub fn encode(&self) -> Block {
        let mut block = [b' '; RECORD_SIZE];
        block[..3].copy_from_slice(&self.label.identifier);
        block[3] = self.label.number;
        self.volume_identifier.write(&mut block, 4);
        block[10] = self.accessibility;
        self.owner_identifier.write(&mut block, 37);
        self.owner_name.write(&mut block, 40);
        block[50] = self.dec_standard_version;
        block[79] = self.label_standard_version;
        block
    }
}

/// Which of the two file labels a [`FileLabel`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// `HDR`, before the data blocks
    Header,
    /// `EOF`, after the data blocks
    Trailer,
}

impl LabelKind {
    /// Label identifier bytes
    pub const fn identifier(&self) -> &'static [u8; 3] {
        match self {
            LabelKind::Header => HEADER_LABEL,
            LabelKind::Trailer => TRAILER_LABEL,
        }
    }

    /// Label identifier as text
    pub const fn name(&self) -> &'static str {
        match self {
            LabelKind::Header => "HDR",
            LabelKind::Trailer => "EOF",
        }
    }
}

/// File header or trailer; both share one layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLabel {
    /// `HDR1` or `EOF1`
    pub label: LabelId,
    /// 6.3 file name, left justified
    pub file_identifier: TextField<FILE_IDENTIFIER_LEN>,
    /// `RT11A `
    pub file_set_identifier: TextField<6>,
    /// Always `0001`; multi-section files are not supported
    pub section_number: TextField<4>,
    /// 1-based position of the file on tape
    pub sequence_number: TextField<4>,
    /// Generation number, `0001`
    pub generation_number: TextField<4>,
    /// Generation version, `00`
    pub generation_version: TextField<2>,
    /// Packed creation date
    pub creation_date: RtDate,
    /// Packed expiration date, `000000` when unused
    pub expiration_date: RtDate,
    /// Accessibility flag, normally a space
    pub accessibility: u8,
    /// Data blocks since the header; only meaningful in a trailer
    pub block_count: TextField<6>,
    /// `DECRT11A     `
    pub system_code: TextField<13>,
    /// Seven spaces
    pub reserved: TextField<7>,
}

/// A file header label
pub type FileHeader = FileLabel;

/// A file trailer label
pub type FileTrailer = FileLabel;

impl FileLabel {
    /// A new file header for `name` at position `sequence`
    pub fn header(name: &str, sequence: u32, created: RtDate) -> Self {
        Self {
            label: LabelId {
                identifier: *HEADER_LABEL,
                number: LABEL_NUMBER,
            },
            file_identifier: TextField::new(name),
            file_set_identifier: TextField::new(FILE_SET_IDENTIFIER),
            section_number: TextField::from_number(1),
            sequence_number: TextField::from_number(sequence),
            generation_number: TextField::from_number(1),
            generation_version: TextField::from_number(0),
            creation_date: created,
            expiration_date: RtDate::expired(),
            accessibility: b' ',
            block_count: TextField::from_number(0),
            system_code: TextField::new(SYSTEM_CODE),
            reserved: TextField::blank(),
        }
    }

    /// The trailer matching this header, recording `blocks` data blocks
    pub fn trailer(&self, blocks: u32) -> Self {
        Self {
            label: LabelId {
                identifier: *TRAILER_LABEL,
                number: LABEL_NUMBER,
            },
            block_count: TextField::from_number(blocks),
            ..self.clone()
        }
    }

    /// Decode from a 512-byte record
    pub fn decode(block: &Block) -> Self {
        let mut created = [0u8; 6];
        created.copy_from_slice(&block[41..47]);
        let mut expires = [0u8; 6];
        expires.copy_from_slice(&block[47..53]);

        Self {
            label: LabelId::of(block),
            file_identifier: TextField::read(block, 4),
            file_set_identifier: TextField::read(block, 21),
            section_number: TextField::read(block, 27),
            sequence_number: TextField::read(block, 31),
            generation_number: TextField::read(block, 35),
            generation_version: TextField::read(block, 39),
            creation_date: RtDate(created),
            expiration_date: RtDate(expires),
            accessibility: block[53],
            block_count: TextField::read(block, 54),
            system_code: TextField::read(block, 60),
            reserved: TextField::read(block, 73),
        }
    }

    /// Encode into a 512-byte record; bytes past the label are zero
    pub fn encode(&self) -> Block {
        let mut block = [0u8; RECORD_SIZE];
        block[..3].copy_from_slice(&self.label.identifier);
        block[3] = self.label.number;
        self.file_identifier.write(&mut block, 4);
        self.file_set_identifier.write(&mut block, 21);
        self.section_number.write(&mut block, 27);
        self.sequence_number.write(&mut block, 31);
        self.generation_number.write(&mut block, 35);
        self.generation_version.write(&mut block, 39);
        block[41..47].copy_from_slice(self.creation_date.as_bytes());
        block[47..53].copy_from_slice(self.expiration_date.as_bytes());
        block[53] = self.accessibility;
        self.block_count.write(&mut block, 54);
        self.system_code.write(&mut block, 60);
        self.reserved.write(&mut block, 73);
        block
    }

    /// True if the label is `kind` with label number `'1'`
    pub fn is(&self, kind: LabelKind) -> bool {
        self.label.is(kind.identifier())
    }

    /// Trimmed file name
    pub fn name(&self) -> String {
        self.file_identifier.to_string_lossy()
    }

    /// Embedded sequence number
    pub fn sequence(&self) -> u32 {
        self.sequence_number.number()
    }

    /// Recorded block count
    pub fn blocks(&self) -> u32 {
        self.block_count.number()
    }
}

/// Map a host file name onto the 6.3 convention: upper case, base name cut
/// to 6 characters and extension to 3
pub fn rt11_name(host_name: &str) -> String {
    let upper = host_name.to_ascii_uppercase();
    let (base, ext) = match upper.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (upper.as_str(), None),
    };
    let base: String = base.chars().filter(|c| !c.is_whitespace()).take(6).collect();
    match ext {
        Some(ext) if !ext.is_empty() => {
            let ext: String = ext.chars().filter(|c| !c.is_whitespace()).take(3).collect();
            format!("{base}.{ext}")
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_header_layout() {
        let block = VolumeHeader::new("MYTAPE").encode();
        assert_eq!(&block[0..4], b"VOL1");
        assert_eq!(&block[4..10], b"RT11A ");
        assert_eq!(&block[37..40], b"D%B");
        assert_eq!(&block[40..50], b"MYTAPE    ");
        assert_eq!(block[50], b'1');
        assert_eq!(block[79], b'3');
        assert!(block[80..].iter().all(|&b| b == b' '));

        let decoded = VolumeHeader::decode(&block);
        assert!(decoded.label.is(VOLUME_LABEL));
        assert_eq!(decoded.owner_name.trimmed(), b"MYTAPE");
    }

    #[test]
    fn test_file_header_layout() {
        let header = FileLabel::header("HELLO.TXT", 3, RtDate(*b" 90032"));
        let block = header.encode();
        assert_eq!(&block[0..4], b"HDR1");
        assert_eq!(&block[4..21], b"HELLO.TXT        ");
        assert_eq!(&block[21..27], b"RT11A ");
        assert_eq!(&block[27..31], b"0001");
        assert_eq!(&block[31..35], b"0003");
        assert_eq!(&block[35..39], b"0001");
        assert_eq!(&block[39..41], b"00");
        assert_eq!(&block[41..47], b" 90032");
        assert_eq!(&block[47..53], b"000000");
        assert_eq!(block[53], b' ');
        assert_eq!(&block[54..60], b"000000");
        assert_eq!(&block[60..73], b"DECRT11A     ");
        assert_eq!(&block[73..80], b"       ");
        assert!(block[80..].iter().all(|&b| b == 0));

        assert_eq!(FileLabel::decode(&block), header);
    }

    #[test]
    fn test_trailer_shares_header_fields() {
        let header = FileLabel::header("A.B", 1, RtDate(*b"124100"));
        let trailer = header.trailer(42);
        assert!(trailer.is(LabelKind::Trailer));
        assert_eq!(trailer.file_identifier, header.file_identifier);
        assert_eq!(trailer.sequence_number, header.sequence_number);
        assert_eq!(trailer.blocks(), 42);
        assert_eq!(header.blocks(), 0);
    }

    #[test]
    fn test_long_identifier_keeps_leftmost_17() {
        let header = FileLabel::header("ABCDEFGHIJKLMNOPQRSTUV", 1, RtDate::expired());
        assert_eq!(header.file_identifier.as_bytes(), b"ABCDEFGHIJKLMNOPQ");
    }

    #[test]
    fn test_rt11_name() {
        assert_eq!(rt11_name("hello.txt"), "HELLO.TXT");
        assert_eq!(rt11_name("longfilename.text"), "LONGFI.TEX");
        assert_eq!(rt11_name("README"), "README");
        assert_eq!(rt11_name(".profile"), ".PROFI");
    }
}
