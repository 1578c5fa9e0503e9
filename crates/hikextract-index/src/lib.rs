//! # hikextract-index
//!
//! Pure Rust decoder for the fixed-layout binary index files written by
//! Hikvision-style DVR firmware (`index00.bin`).
//!
//! The index describes a set of recorded container files and, for each,
//! a fixed-size table of video/motion segments given as byte ranges.
//! This crate handles the decoding side only: fixed-offset field
//! parsing with little-endian normalization, sentinel filtering,
//! positional file/segment association, and time-range containment
//! validation. It never opens the container files themselves.
//!
//! ## Example
//!
//! ```no_run
//! use hikextract_index::{IndexError, IndexReader};
//!
//! let reader = IndexReader::open("/media/dvr/index00.bin")?;
//! println!("{} file records", reader.header().file_count);
//!
//! reader.visit_segments(|file, slot, segment| -> Result<(), IndexError> {
//!     println!(
//!         "ch{} slot {}: {} bytes",
//!         file.channel,
//!         slot,
//!         segment.byte_len()
//!     );
//!     Ok(())
//! })?;
//! # Ok::<(), hikextract_index::IndexError>(())
//! ```

pub mod error;
pub mod reader;
pub mod record;

pub use error::{IndexError, Result};
pub use reader::{IndexReader, ReaderOptions};
pub use record::{
    FileRecord, IndexHeader, SegmentRecord, DEFAULT_SEGMENTS_PER_FILE, EMPTY_CHANNEL,
    FILE_RECORD_LEN, HEADER_LEN, SEGMENT_RECORD_LEN,
};

/// File name of the index within a DVR data directory.
pub const INDEX_FILE_NAME: &str = "index00.bin";
