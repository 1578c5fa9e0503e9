//! Fixed-layout record decoding.
//!
//! All multi-byte integers are little-endian on disk and are read
//! field-by-field at fixed offsets. Reserved ranges are never
//! interpreted; the record structs only carry the meaningful fields.

use byteorder::{ByteOrder, LittleEndian};

/// On-disk size of the index header.
pub const HEADER_LEN: usize = 1280;
/// On-disk size of one file record.
pub const FILE_RECORD_LEN: usize = 40;
/// On-disk size of one segment record.
pub const SEGMENT_RECORD_LEN: usize = 64;

/// Default number of segment slots that follow each file record.
pub const DEFAULT_SEGMENTS_PER_FILE: usize = 256;

/// Channel value marking an unused file record slot.
pub const EMPTY_CHANNEL: u16 = 0xFFFF;

/// Index file metadata.
///
/// The header is 1280 bytes on disk; everything past the fields below
/// (except the trailing checksum) is reserved padding.
#[derive(Debug, Clone)]
pub struct IndexHeader {
    pub modify_time: u64,
    pub version: u32,
    /// Number of file records that follow the header.
    pub file_count: u32,
    pub next_file_rec_no: u32,
    pub last_file_rec_no: u32,
    pub checksum: u32,
}

impl IndexHeader {
    /// Decode a header from its 1280-byte on-disk image.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        Self {
            modify_time: LittleEndian::read_u64(&buf[0..8]),
            version: LittleEndian::read_u32(&buf[8..12]),
            file_count: LittleEndian::read_u32(&buf[12..16]),
            next_file_rec_no: LittleEndian::read_u32(&buf[16..20]),
            last_file_rec_no: LittleEndian::read_u32(&buf[20..24]),
            checksum: LittleEndian::read_u32(&buf[1276..1280]),
        }
    }
}

/// Metadata for one recorded container file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub file_no: u32,
    pub channel: u16,
    pub segment_count: u16,
    /// Epoch seconds.
    pub start_time: u32,
    /// Epoch seconds.
    pub end_time: u32,
    pub status: u8,
    pub locked_segment: u16,
}

impl FileRecord {
    /// Decode a file record from its 40-byte on-disk image.
    pub fn decode(buf: &[u8; FILE_RECORD_LEN]) -> Self {
        Self {
            file_no: LittleEndian::read_u32(&buf[0..4]),
            channel: LittleEndian::read_u16(&buf[4..6]),
            segment_count: LittleEndian::read_u16(&buf[14..16]),
            start_time: LittleEndian::read_u32(&buf[16..20]),
            end_time: LittleEndian::read_u32(&buf[20..24]),
            status: buf[24],
            locked_segment: LittleEndian::read_u16(&buf[26..28]),
        }
    }

    /// Whether this slot is unused (sentinel channel).
    pub fn is_empty(&self) -> bool {
        self.channel == EMPTY_CHANNEL
    }

    /// Whether a segment's time range lies fully within this file's range.
    pub fn contains(&self, segment: &SegmentRecord) -> bool {
        self.start_time <= segment.start_time && self.end_time >= segment.end_time
    }
}

/// Metadata for one video/motion segment within a container file.
#[derive(Debug, Clone)]
pub struct SegmentRecord {
    pub kind: u8,
    pub status: u8,
    pub start_time: u32,
    pub end_time: u32,
    pub first_key_frame_abs: u32,
    pub first_key_frame_std: u32,
    pub last_frame_std: u32,
    /// Byte offset of the segment in the container file.
    pub start_offset: u32,
    pub end_offset: u32,
}

impl SegmentRecord {
    /// Decode a segment record from its 64-byte on-disk image.
    pub fn decode(buf: &[u8; SEGMENT_RECORD_LEN]) -> Self {
        Self {
            kind: buf[0],
            status: buf[1],
            start_time: LittleEndian::read_u32(&buf[4..8]),
            end_time: LittleEndian::read_u32(&buf[12..16]),
            first_key_frame_abs: LittleEndian::read_u32(&buf[20..24]),
            first_key_frame_std: LittleEndian::read_u32(&buf[32..36]),
            start_offset: LittleEndian::read_u32(&buf[36..40]),
            end_offset: LittleEndian::read_u32(&buf[40..44]),
            last_frame_std: LittleEndian::read_u32(&buf[60..64]),
        }
    }

    /// Whether this slot is unused (sentinel type or zero time range).
    pub fn is_empty(&self) -> bool {
        self.kind == 0 || self.start_time == 0 || self.end_time == 0
    }

    /// Number of bytes the segment occupies in the container file.
    pub fn byte_len(&self) -> u64 {
        u64::from(self.end_offset).saturating_sub(u64::from(self.start_offset))
    }

    /// Segment duration in seconds.
    pub fn play_time(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }
}
