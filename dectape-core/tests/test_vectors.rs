//! Byte-exact tape vectors and the error each kind of damage produces

use dectape_core::{
    constants::{DATA_MARKER, END_OF_TAPE, RECORD_SIZE, TAPE_MARKER},
    error::FramingReason,
    header::FileLabel,
    reader::{read_tape, Termination},
    record::encode_record,
    RtDate, TapeError, TapeWriter, VolumeHeader,
};
use std::io::Cursor;

fn volume() -> Vec<u8> {
    encode_record(&VolumeHeader::new("VECTORS").encode()).to_vec()
}

fn header(name: &str, sequence: u32) -> FileLabel {
    FileLabel::header(name, sequence, RtDate::new(1990, 32))
}

/// A well-formed single-file tape, built record by record
fn one_file_tape() -> Vec<u8> {
    let hdr = header("HELLO.TXT", 1);
    let mut tape = volume();
    tape.extend_from_slice(&encode_record(&hdr.encode()));
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(&encode_record(&[b'h'; RECORD_SIZE]));
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(&encode_record(&hdr.trailer(1).encode()));
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(END_OF_TAPE);
    tape
}

#[test]
fn vector_volume_record() {
    let record = volume();
    assert_eq!(record.len(), 520);
    assert_eq!(&record[..4], TAPE_MARKER);
    assert_eq!(&record[516..], TAPE_MARKER);

    let payload = &record[4..516];
    assert_eq!(&payload[..11], b"VOL1RT11A  ");
    assert_eq!(&payload[37..51], b"D%BVECTORS   1");
    assert_eq!(payload[79], b'3');
    assert!(payload[80..].iter().all(|&b| b == b' '));
}

#[test]
fn vector_file_header_record() {
    let payload = header("HELLO.TXT", 1).encode();
    let expected = [
        &b"HDR1"[..],
        b"HELLO.TXT        ",
        b"RT11A ",
        b"0001",
        b"0001",
        b"0001",
        b"00",
        b" 90032",
        b"000000",
        b" ",
        b"000000",
        b"DECRT11A     ",
        b"       ",
    ]
    .concat();
    assert_eq!(expected.len(), 80);
    assert_eq!(&payload[..80], &expected[..]);
    assert!(payload[80..].iter().all(|&b| b == 0));
}

#[test]
fn vector_file_trailer_record() {
    let payload = header("HELLO.TXT", 3).trailer(2).encode();
    assert_eq!(&payload[..4], b"EOF1");
    assert_eq!(&payload[31..35], b"0003");
    assert_eq!(&payload[54..60], b"000002");
}

#[test]
fn vector_twenty_first_century_date() {
    let payload = FileLabel::header("NEW.DAT", 1, RtDate::new(2024, 100)).encode();
    assert_eq!(&payload[41..47], b"124100");
}

#[test]
fn vector_writer_matches_hand_built_tape() {
    let mut writer = TapeWriter::initialize(Cursor::new(Vec::new()), "VECTORS", 0).unwrap();
    writer
        .append_file("HELLO.TXT", RtDate::new(1990, 32), &[b'h'; RECORD_SIZE][..])
        .unwrap();
    let tape = writer.finish().unwrap().into_inner();

    let expected = one_file_tape();
    assert_eq!(&tape[..expected.len()], &expected[..]);
}

#[test]
fn vector_one_file_tape_reads_clean() {
    let tape = one_file_tape();
    let summary = read_tape(&tape).unwrap();
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].blocks, 1);
    assert_eq!(summary.files[0].offset, 520);
    assert_eq!(
        summary.termination,
        Termination::Clean {
            end_offset: tape.len() as u64 - 8
        }
    );
}

#[test]
fn vector_tape_without_volume_header() {
    let tape = one_file_tape();
    let summary = read_tape(&tape[520..]).unwrap();
    assert!(summary.volume.is_none());
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].name(), "HELLO.TXT");
}

#[test]
fn vector_unknown_marker() {
    let mut tape = one_file_tape();
    tape[1] = 0x01;
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(err, TapeError::UnknownMarker { offset: 0, .. }));
    assert_eq!(err.exit_code(), -3);
}

#[test]
fn vector_trailing_marker_mismatch() {
    let mut tape = one_file_tape();
    tape[517] = 0x07;
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(
        err,
        TapeError::Framing {
            offset: 516,
            reason: FramingReason::TrailerMismatch(_)
        }
    ));
    assert_eq!(err.exit_code(), -4);
}

#[test]
fn vector_truncated_payload() {
    let tape = one_file_tape();
    let err = read_tape(&tape[..300]).unwrap_err();
    assert!(matches!(
        err,
        TapeError::Framing {
            offset: 4,
            reason: FramingReason::ShortPayload
        }
    ));
}

#[test]
fn vector_bad_volume_label() {
    let mut tape = one_file_tape();
    tape[4..8].copy_from_slice(b"XYZ1");
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(err, TapeError::LabelMismatch { expected: "VOL", .. }));
    assert_eq!(err.exit_code(), -8);
}

#[test]
fn vector_empty_tape() {
    let err = read_tape(END_OF_TAPE).unwrap_err();
    assert!(matches!(err, TapeError::EmptyTape));
    assert_eq!(err.exit_code(), -9);
}

#[test]
fn vector_trailer_where_header_expected() {
    let mut tape = volume();
    tape.extend_from_slice(&encode_record(&header("A", 1).trailer(0).encode()));
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(
        err,
        TapeError::LabelMismatch {
            offset: 520,
            expected: "HDR",
            ..
        }
    ));
    assert_eq!(err.exit_code(), -10);
}

#[test]
fn vector_missing_data_marker_after_header() {
    let hdr = header("A", 1);
    let mut tape = volume();
    tape.extend_from_slice(&encode_record(&hdr.encode()));
    tape.extend_from_slice(&encode_record(&[0; RECORD_SIZE]));
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(
        err,
        TapeError::MissingDataMarker { offset: 1040, .. }
    ));
    assert_eq!(err.exit_code(), -11);
}

#[test]
fn vector_header_where_trailer_expected() {
    let hdr = header("A", 1);
    let mut tape = volume();
    tape.extend_from_slice(&encode_record(&hdr.encode()));
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(&encode_record(&hdr.encode()));
    let err = read_tape(&tape).unwrap_err();
    assert!(matches!(
        err,
        TapeError::LabelMismatch {
            offset: 1048,
            expected: "EOF",
            ..
        }
    ));
    assert_eq!(err.exit_code(), -12);
}
