//! Fuzzing entry points for dectape-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_read_tape

use dectape_core::{
    extract::{Extractor, FileSink},
    header::{FileLabel, VolumeHeader},
    listing::Lister,
    record::decode_record,
    Block, TapeReader,
};
use std::io::{self, Write};

pub fn fuzz_decode_record(data: &[u8]) {
    // Try to decode - should never panic
    let _ = decode_record(data);
}

pub fn fuzz_read_tape(data: &[u8]) {
    // Full pass with listing output - should never panic
    let _ = TapeReader::new(data).run(&mut Lister::new(io::sink()));
}

pub fn fuzz_decode_labels(data: &[u8]) {
    let Ok(block) = Block::try_from(data) else {
        return;
    };
    let header = FileLabel::decode(&block);
    let _ = (header.name(), header.sequence(), header.blocks());
    let _ = header.creation_date.to_string();
    let _ = VolumeHeader::decode(&block);
}

struct NullSink;

impl FileSink for NullSink {
    fn create(&mut self, _name: &str) -> dectape_core::Result<Option<Box<dyn Write>>> {
        Ok(Some(Box::new(io::sink())))
    }

    fn set_creation_date(
        &mut self,
        _name: &str,
        _year: i32,
        _day_of_year: u32,
    ) -> dectape_core::Result<()> {
        Ok(())
    }
}

pub fn fuzz_extract(data: &[u8]) {
    let _ = TapeReader::new(data).run(&mut Extractor::new(NullSink));
}
