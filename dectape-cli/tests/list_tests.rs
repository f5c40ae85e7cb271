use dectape_cli::commands::list::{list_to, TapeDirectory};
use dectape_cli::{exit_code, Outcome};
use dectape_core::{
    constants::{DATA_MARKER, END_OF_TAPE, RECORD_SIZE},
    header::FileLabel,
    record::encode_record,
    RtDate, TapeWriter, VolumeHeader,
};
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

/// Helper: a tape holding the given files
fn create_tape(files: &[(&str, usize)]) -> Vec<u8> {
    let mut writer = TapeWriter::initialize(Cursor::new(Vec::new()), "dectape", 0).unwrap();
    for (name, len) in files {
        let data = vec![b'x'; *len];
        writer
            .append_file(name, RtDate::new(1990, 32), &data[..])
            .unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Helper: a tape that ends before the trailer of its only file
fn create_cut_tape() -> Vec<u8> {
    let mut tape = encode_record(&VolumeHeader::new("CUT").encode()).to_vec();
    let header = FileLabel::header("CUT.DAT", 1, RtDate::new(1990, 32));
    tape.extend_from_slice(&encode_record(&header.encode()));
    tape.extend_from_slice(DATA_MARKER);
    tape.extend_from_slice(&encode_record(&[0; RECORD_SIZE]));
    tape.extend_from_slice(END_OF_TAPE);
    tape
}

#[test]
fn test_list_directory() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("test.tap");
    fs::write(&tape, create_tape(&[("HELLO.TXT", 600), ("SWAP.SYS", 2048)])).unwrap();

    let mut out = Vec::new();
    let outcome = list_to(&tape, false, &mut out).unwrap();
    assert_eq!(outcome, Outcome::Success);

    let listing = String::from_utf8(out).unwrap();
    assert!(listing.starts_with("RT11 TAPE  'D%B' 'dectape   ' V1 Label V3\n"));
    assert!(listing.contains("FILE NAME"));
    assert!(listing.contains("  HELLO.TXT          01-Feb-90       2         1024\n"));
    assert!(listing.contains("  SWAP.SYS           01-Feb-90       4         2048\n"));
    assert!(listing.contains("  2 files, 6 blocks, 3072 bytes"));
    assert!(listing.ends_with("\nEND OF TAPE\n\n"));
}

#[test]
fn test_list_json() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("test.tap");
    fs::write(&tape, create_tape(&[("A.TXT", 10)])).unwrap();

    let mut out = Vec::new();
    list_to(&tape, true, &mut out).unwrap();

    let directory: TapeDirectory = serde_json::from_slice(&out).unwrap();
    assert_eq!(directory.label.as_deref(), Some("dectape"));
    assert_eq!(directory.files.len(), 1);
    assert_eq!(directory.files[0].name, "A.TXT");
    assert_eq!(directory.files[0].created, "01-Feb-90");
    assert_eq!(directory.total_bytes, 512);
    assert!(directory.complete);
    assert!(directory.warnings.is_empty());
}

#[test]
fn test_list_unexpected_end() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("cut.tap");
    fs::write(&tape, create_cut_tape()).unwrap();

    let mut out = Vec::new();
    let outcome = list_to(&tape, false, &mut out).unwrap();
    assert_eq!(outcome, Outcome::UnexpectedEnd);
    assert_eq!(outcome.code(), 1);

    let listing = String::from_utf8(out).unwrap();
    assert!(listing.contains("CUT.DAT"));
    assert!(listing.contains("unexpected (missing EOF record)"));
}

#[test]
fn test_list_missing_file() {
    let dir = tempdir().unwrap();
    let err = list_to(&dir.path().join("nope.tap"), false, Vec::new()).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_list_corrupt_tape() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("bad.tap");
    let mut data = create_tape(&[("A.TXT", 10)]);
    data[0] = 0x55;
    fs::write(&tape, data).unwrap();

    let err = list_to(&tape, false, Vec::new()).unwrap_err();
    assert_eq!(exit_code(&err), -3);
    assert!(format!("{err:#}").contains("Unknown marker"));
}
