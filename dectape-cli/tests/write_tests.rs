use dectape_cli::commands::{init, list::list_to, write};
use dectape_cli::{exit_code, Options, Outcome, MEGABYTE};
use dectape_core::{fsio::set_modification_date, reader::read_tape, TapeError};
use std::fs;
use tempfile::tempdir;

fn options() -> Options {
    Options {
        prompt: false,
        size_mb: 1,
        label: "TESTTAPE".to_string(),
        ..Options::default()
    }
}

#[test]
fn test_initialize_tape() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("blank.tap");

    assert_eq!(init::execute(&tape, &options()).unwrap(), Outcome::Success);

    let data = fs::read(&tape).unwrap();
    assert_eq!(data.len() as u64, MEGABYTE);
    let summary = read_tape(&data).unwrap();
    assert_eq!(
        summary.volume.unwrap().owner_name.to_string_lossy(),
        "TESTTAPE"
    );
    assert!(summary.files.is_empty());
}

#[test]
fn test_initialize_declines_existing_without_prompt() {
    let dir = tempdir().unwrap();
    let tape = dir.path().join("existing.tap");
    fs::write(&tape, b"precious").unwrap();

    let err = init::execute(&tape, &options()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TapeError>(),
        Some(TapeError::UserDeclined)
    ));
    assert_eq!(exit_code(&err), 1);
    assert_eq!(fs::read(&tape).unwrap(), b"precious");

    let overwrite = Options {
        overwrite: true,
        ..options()
    };
    assert_eq!(init::execute(&tape, &overwrite).unwrap(), Outcome::Success);
    assert_eq!(fs::metadata(&tape).unwrap().len(), MEGABYTE);
}

#[test]
fn test_write_directory_to_tape() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("hello.txt"), vec![b'h'; 600]).unwrap();
    fs::write(src.join("readme"), b"read me").unwrap();
    fs::create_dir(src.join("subdir")).unwrap();
    set_modification_date(&src.join("hello.txt"), 1990, 32).unwrap();

    let tape = dir.path().join("out.tap");
    assert_eq!(
        write::execute(&src, &tape, &options()).unwrap(),
        Outcome::Success
    );

    let mut out = Vec::new();
    list_to(&tape, false, &mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();
    assert!(listing.contains("RT11 TAPE  'D%B' 'TESTTAPE  '"));
    assert!(listing.contains("  HELLO.TXT          01-Feb-90       2         1024\n"));
    assert!(listing.contains("  README "));
    assert!(listing.contains("  2 files, 3 blocks, 1536 bytes"));
    assert!(!listing.contains("SUBDIR"));
}

#[test]
fn test_write_with_wildcard() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::write(dir.path().join("b.dat"), b"b").unwrap();

    let tape = dir.path().join("out.tap");
    write::execute(&dir.path().join("*.txt"), &tape, &options()).unwrap();

    let summary = read_tape(&fs::read(&tape).unwrap()).unwrap();
    let names: Vec<_> = summary.files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["A.TXT"]);
}

#[test]
fn test_append_continues_tape() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();
    fs::write(first.join("one.txt"), b"1").unwrap();
    fs::write(second.join("two.txt"), b"2").unwrap();

    let tape = dir.path().join("t.tap");
    write::execute(&first, &tape, &options()).unwrap();

    let append = Options {
        append: true,
        ..options()
    };
    write::execute(&second, &tape, &append).unwrap();

    let summary = read_tape(&fs::read(&tape).unwrap()).unwrap();
    assert!(summary.is_complete());
    assert!(summary.warnings.is_empty());
    let names: Vec<_> = summary.files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["ONE.TXT", "TWO.TXT"]);
    assert_eq!(summary.files[1].header.sequence(), 2);
}

#[test]
fn test_append_to_missing_tape() {
    let dir = tempdir().unwrap();
    let append = Options {
        append: true,
        ..options()
    };
    let err = write::execute(dir.path(), &dir.path().join("missing.tap"), &append).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_tape_inside_source_directory_is_not_copied() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), b"data").unwrap();
    let tape = dir.path().join("t.tap");
    init::execute(&tape, &options()).unwrap();

    let append = Options {
        append: true,
        ..options()
    };
    assert_eq!(
        write::execute(dir.path(), &tape, &append).unwrap(),
        Outcome::Success
    );

    let data = fs::read(&tape).unwrap();
    assert_eq!(data.len() as u64, MEGABYTE);
    let summary = read_tape(&data).unwrap();
    let names: Vec<_> = summary.files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["DATA.TXT"]);

    let overwrite = Options {
        overwrite: true,
        ..options()
    };
    write::execute(dir.path(), &tape, &overwrite).unwrap();
    let summary = read_tape(&fs::read(&tape).unwrap()).unwrap();
    assert_eq!(summary.files.len(), 1);
}
