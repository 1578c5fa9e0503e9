//! Streaming index reader.
//!
//! Reads the header and file-record table up front (they are held for
//! the life of the run), then traverses the per-file segment blocks in
//! a single pass, yielding only validated segments to a visitor.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::record::{
    FileRecord, IndexHeader, SegmentRecord, DEFAULT_SEGMENTS_PER_FILE, FILE_RECORD_LEN, HEADER_LEN,
    SEGMENT_RECORD_LEN,
};

/// Upper bound on the file-table pre-allocation. Only an optimization
/// hint; `file_count` itself still bounds how many records are read.
const FILE_TABLE_PREALLOC_CAP: usize = 4096;

/// Reader configuration.
///
/// The segment-slot count is data, not a compiled-in constant; the
/// default matches the format as shipped.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Number of segment record slots following each file record.
    pub segments_per_file: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            segments_per_file: DEFAULT_SEGMENTS_PER_FILE,
        }
    }
}

/// Streaming reader over one index file.
#[derive(Debug)]
pub struct IndexReader<R> {
    inner: R,
    header: IndexHeader,
    files: Vec<FileRecord>,
    segments_per_file: usize,
}

impl IndexReader<BufReader<File>> {
    /// Open an index file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> IndexReader<R> {
    /// Create a reader with default options.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_options(inner, ReaderOptions::default())
    }

    /// Create a reader, parsing the header and the file-record table.
    ///
    /// The header's `file_count` bounds the number of file records
    /// read; nothing beyond that count is parsed. Sentinel file
    /// records are kept in the table so positional association with
    /// their segment blocks stays intact, but they are never yielded.
    pub fn with_options(mut inner: R, options: ReaderOptions) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        read_block(&mut inner, &mut buf, "index header")?;
        let header = IndexHeader::decode(&buf);

        tracing::debug!(
            version = header.version,
            file_count = header.file_count,
            next_file_rec_no = header.next_file_rec_no,
            last_file_rec_no = header.last_file_rec_no,
            "parsed index header"
        );

        // A corrupt header can claim billions of records; let the
        // per-record reads expose the lie instead of the allocator.
        let mut files =
            Vec::with_capacity((header.file_count as usize).min(FILE_TABLE_PREALLOC_CAP));
        for i in 0..header.file_count {
            let mut buf = [0u8; FILE_RECORD_LEN];
            read_block(&mut inner, &mut buf, "file record")?;
            let record = FileRecord::decode(&buf);

            if record.is_empty() {
                tracing::debug!(index = i, "skipping empty file record");
            } else {
                tracing::debug!(
                    index = i,
                    file_no = record.file_no,
                    channel = record.channel,
                    start_time = record.start_time,
                    end_time = record.end_time,
                    "parsed file record"
                );
            }

            files.push(record);
        }

        Ok(Self {
            inner,
            header,
            files,
            segments_per_file: options.segments_per_file,
        })
    }

    /// The decoded index header.
    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    /// All file records in on-disk order, sentinel slots included.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// File records that are actually in use.
    pub fn active_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().filter(|f| !f.is_empty())
    }

    /// Traverse every segment block in a single streaming pass.
    ///
    /// The visitor receives the owning file record, the segment's slot
    /// index within that file, and the decoded segment. Only segments
    /// that pass sentinel filtering and the time-range containment
    /// check are yielded; containment violations are reported as
    /// warnings and excluded. Consumes the reader: the pass cannot be
    /// repeated.
    pub fn visit_segments<E, F>(mut self, mut visit: F) -> std::result::Result<(), E>
    where
        E: From<IndexError>,
        F: FnMut(&FileRecord, usize, SegmentRecord) -> std::result::Result<(), E>,
    {
        for (file_index, file) in self.files.iter().enumerate() {
            for slot in 0..self.segments_per_file {
                let mut buf = [0u8; SEGMENT_RECORD_LEN];
                read_block(&mut self.inner, &mut buf, "segment record")?;

                // Segment blocks of empty file records still occupy
                // their slots on disk and must be read past.
                if file.is_empty() {
                    continue;
                }

                let segment = SegmentRecord::decode(&buf);
                if segment.is_empty() {
                    continue;
                }

                if !file.contains(&segment) {
                    tracing::warn!(
                        file_index,
                        slot,
                        file_start = file.start_time,
                        file_end = file.end_time,
                        segment_start = segment.start_time,
                        segment_end = segment.end_time,
                        "segment time range not contained in file record, skipping"
                    );
                    continue;
                }

                tracing::debug!(
                    file_index,
                    slot,
                    kind = segment.kind,
                    start_time = segment.start_time,
                    end_time = segment.end_time,
                    start_offset = segment.start_offset,
                    end_offset = segment.end_offset,
                    "parsed segment record"
                );

                visit(file, slot, segment)?;
            }
        }

        Ok(())
    }
}

/// Read exactly `buf.len()` bytes, mapping a short read to `Truncated`.
fn read_block<R: Read>(inner: &mut R, buf: &mut [u8], what: &'static str) -> Result<()> {
    inner.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            IndexError::Truncated {
                what,
                need: buf.len(),
            }
        } else {
            IndexError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EMPTY_CHANNEL;
    use byteorder::{ByteOrder, LittleEndian};
    use std::io::Cursor;

    fn header_bytes(file_count: u32) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        LittleEndian::write_u32(&mut buf[8..12], 1);
        LittleEndian::write_u32(&mut buf[12..16], file_count);
        buf
    }

    fn file_record_bytes(file_no: u32, channel: u16, start: u32, end: u32) -> Vec<u8> {
        let mut buf = vec![0u8; FILE_RECORD_LEN];
        LittleEndian::write_u32(&mut buf[0..4], file_no);
        LittleEndian::write_u16(&mut buf[4..6], channel);
        LittleEndian::write_u32(&mut buf[16..20], start);
        LittleEndian::write_u32(&mut buf[20..24], end);
        buf
    }

    fn segment_bytes(kind: u8, start: u32, end: u32, offsets: (u32, u32)) -> Vec<u8> {
        let mut buf = vec![0u8; SEGMENT_RECORD_LEN];
        buf[0] = kind;
        LittleEndian::write_u32(&mut buf[4..8], start);
        LittleEndian::write_u32(&mut buf[12..16], end);
        LittleEndian::write_u32(&mut buf[36..40], offsets.0);
        LittleEndian::write_u32(&mut buf[40..44], offsets.1);
        buf
    }

    fn empty_segments(count: usize) -> Vec<u8> {
        vec![0u8; count * SEGMENT_RECORD_LEN]
    }

    #[test]
    fn reads_exactly_file_count_records() {
        let mut data = header_bytes(2);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        data.extend(file_record_bytes(1, 2, 3000, 4000));
        data.extend(empty_segments(512));
        // Trailing garbage past the declared records must never be parsed.
        data.extend([0xAAu8; 123]);

        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        assert_eq!(reader.header().file_count, 2);
        assert_eq!(reader.files().len(), 2);

        let mut yielded = 0usize;
        reader
            .visit_segments(|_, _, _| -> Result<()> {
                yielded += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(yielded, 0);
    }

    #[test]
    fn sentinel_file_record_never_yields_segments() {
        let mut data = header_bytes(2);
        data.extend(file_record_bytes(0, EMPTY_CHANNEL, 0, 0));
        data.extend(file_record_bytes(1, 5, 1000, 2000));
        // Block for the empty file holds a would-be-valid segment.
        let mut block0 = segment_bytes(1, 1200, 1500, (0, 10));
        block0.extend(empty_segments(255));
        data.extend(block0);
        let mut block1 = segment_bytes(1, 1100, 1900, (100, 200));
        block1.extend(empty_segments(255));
        data.extend(block1);

        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        let mut hits = Vec::new();
        reader
            .visit_segments(|file, slot, segment| -> Result<()> {
                hits.push((file.channel, slot, segment.start_offset));
                Ok(())
            })
            .unwrap();

        // Only the second file's segment surfaces, and positional
        // association still holds despite the sentinel in slot 0.
        assert_eq!(hits, vec![(5, 0, 100)]);
    }

    #[test]
    fn containment_violation_excludes_segment() {
        let mut data = header_bytes(1);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        let mut block = segment_bytes(1, 900, 1500, (0, 10)); // starts before the file
        block.extend(segment_bytes(1, 1200, 1500, (100, 200)));
        block.extend(empty_segments(254));
        data.extend(block);

        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        let mut hits = Vec::new();
        reader
            .visit_segments(|_, slot, segment| -> Result<()> {
                hits.push((slot, segment.start_offset));
                Ok(())
            })
            .unwrap();

        assert_eq!(hits, vec![(1, 100)]);
    }

    #[test]
    fn truncated_header_is_fatal() {
        let data = vec![0u8; HEADER_LEN - 1];
        let err = IndexReader::new(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, IndexError::Truncated { what, .. } if what == "index header"));
    }

    #[test]
    fn truncated_file_record_is_fatal() {
        let mut data = header_bytes(3);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        // Second record cut short.
        data.extend(vec![0u8; FILE_RECORD_LEN / 2]);

        let err = IndexReader::new(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, IndexError::Truncated { what, .. } if what == "file record"));
    }

    #[test]
    fn truncated_segment_block_is_fatal() {
        let mut data = header_bytes(1);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        data.extend(empty_segments(255));
        data.extend(vec![0u8; SEGMENT_RECORD_LEN - 1]);

        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        let err = reader
            .visit_segments(|_, _, _| -> Result<()> { Ok(()) })
            .unwrap_err();
        assert!(matches!(err, IndexError::Truncated { what, .. } if what == "segment record"));
    }

    #[test]
    fn segments_per_file_is_configurable() {
        let mut data = header_bytes(1);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        data.extend(segment_bytes(1, 1200, 1500, (100, 200)));
        data.extend(empty_segments(3));

        let options = ReaderOptions {
            segments_per_file: 4,
        };
        let reader = IndexReader::with_options(Cursor::new(data), options).unwrap();
        let mut yielded = 0usize;
        reader
            .visit_segments(|_, _, _| -> Result<()> {
                yielded += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(yielded, 1);
    }

    #[test]
    fn absurd_file_count_fails_on_read_not_allocation() {
        // file_count = u32::MAX with no records behind it: the first
        // short read must surface as Truncated instead of the header
        // driving a multi-gigabyte pre-allocation.
        let data = header_bytes(u32::MAX);
        let err = IndexReader::new(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, IndexError::Truncated { what, .. } if what == "file record"));
    }

    #[test]
    fn reader_is_debuggable() {
        let mut data = header_bytes(1);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        assert!(format!("{reader:?}").contains("IndexReader"));
    }

    #[test]
    fn visitor_error_propagates() {
        let mut data = header_bytes(1);
        data.extend(file_record_bytes(0, 1, 1000, 2000));
        data.extend(segment_bytes(1, 1200, 1500, (100, 200)));
        data.extend(empty_segments(255));

        let reader = IndexReader::new(Cursor::new(data)).unwrap();
        let err = reader
            .visit_segments(|_, _, _| -> Result<()> {
                Err(IndexError::Truncated {
                    what: "visitor",
                    need: 0,
                })
            })
            .unwrap_err();
        assert!(matches!(err, IndexError::Truncated { what, .. } if what == "visitor"));
    }
}
