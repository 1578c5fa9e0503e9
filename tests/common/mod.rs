//! Shared fixture builders for integration tests.

#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian};
use hikextract_index::{FILE_RECORD_LEN, HEADER_LEN, SEGMENT_RECORD_LEN};
use std::io::Write;
use std::path::Path;

pub struct FileSpec {
    pub file_no: u32,
    pub channel: u16,
    pub start: u32,
    pub end: u32,
    pub segments: Vec<(usize, SegmentSpec)>,
}

pub struct SegmentSpec {
    pub start: u32,
    pub end: u32,
    pub start_offset: u32,
    pub end_offset: u32,
}

/// Serialize a complete index image: header, file records, and one
/// 256-slot segment block per file.
pub fn build_index(files: &[FileSpec]) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_LEN];
    LittleEndian::write_u32(&mut data[8..12], 1);
    LittleEndian::write_u32(&mut data[12..16], files.len() as u32);

    for file in files {
        let mut buf = [0u8; FILE_RECORD_LEN];
        LittleEndian::write_u32(&mut buf[0..4], file.file_no);
        LittleEndian::write_u16(&mut buf[4..6], file.channel);
        LittleEndian::write_u16(&mut buf[14..16], 256);
        LittleEndian::write_u32(&mut buf[16..20], file.start);
        LittleEndian::write_u32(&mut buf[20..24], file.end);
        data.extend_from_slice(&buf);
    }

    for file in files {
        let mut block = vec![0u8; 256 * SEGMENT_RECORD_LEN];
        for (slot, segment) in &file.segments {
            let at = slot * SEGMENT_RECORD_LEN;
            block[at] = 1;
            LittleEndian::write_u32(&mut block[at + 4..at + 8], segment.start);
            LittleEndian::write_u32(&mut block[at + 12..at + 16], segment.end);
            LittleEndian::write_u32(&mut block[at + 36..at + 40], segment.start_offset);
            LittleEndian::write_u32(&mut block[at + 40..at + 44], segment.end_offset);
        }
        data.extend_from_slice(&block);
    }

    data
}

/// The single-file, single-segment scenario: channel 1, file range
/// 1000..2000, one segment 1200..1500 covering bytes [100, 200).
pub fn single_segment_index() -> Vec<u8> {
    build_index(&[FileSpec {
        file_no: 0,
        channel: 1,
        start: 1000,
        end: 2000,
        segments: vec![(
            0,
            SegmentSpec {
                start: 1200,
                end: 1500,
                start_offset: 100,
                end_offset: 200,
            },
        )],
    }])
}

pub fn write_file(path: &Path, data: &[u8]) {
    std::fs::File::create(path).unwrap().write_all(data).unwrap();
}

/// A container file of `len` bytes with a recognizable pattern.
pub fn patterned_container(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
