//! Deterministic file naming.
//!
//! Output names are derived purely from channel, time range, and a
//! prefix/extension, so the same segment always maps to the same name.
//! The extraction engine relies on that for both collision detection
//! and final naming; any format change must keep the two consistent.

use chrono::{DateTime, Utc};

/// Prefix of generated output file names.
pub const OUTPUT_PREFIX: &str = "hikvideo";
/// Extension of extracted video clips.
pub const VIDEO_EXTENSION: &str = ".mp4";
/// Extension of generated thumbnails.
pub const THUMBNAIL_EXTENSION: &str = ".jpg";

/// Prefix of source container files in the DVR data directory.
pub const SOURCE_PREFIX: &str = "hiv";
/// Extension of source container files.
pub const SOURCE_EXTENSION: &str = "mp4";

/// Build the output file name for one segment.
///
/// Timestamps are rendered in UTC: the start as `YYYY-MM-DD_HH.MM.SS`,
/// the end as `HH.MM.SS`.
pub fn segment_file_name(
    prefix: &str,
    extension: &str,
    channel: u16,
    start_time: u32,
    end_time: u32,
) -> String {
    format!(
        "{}_ch{}_{}_to_{}{}",
        prefix,
        channel,
        utc(start_time).format("%Y-%m-%d_%H.%M.%S"),
        utc(end_time).format("%H.%M.%S"),
        extension
    )
}

/// Name of the source container file holding a given file number.
pub fn container_file_name(file_no: u32) -> String {
    format!("{}{:05}.{}", SOURCE_PREFIX, file_no, SOURCE_EXTENSION)
}

fn utc(seconds: u32) -> DateTime<Utc> {
    // u32 epoch seconds are always within chrono's representable range.
    DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
}
