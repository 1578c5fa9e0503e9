//! Run-scoped reporting.
//!
//! User-facing informational output (segment listings, skip notices,
//! aggregate totals) goes through an injected reporter rather than
//! process-wide globals; diagnostics go through `tracing` separately.

use serde::Serialize;

/// One listed/extracted segment, as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentEntry {
    /// Output file name derived by the naming policy.
    pub name: String,
    /// Number of the source container file.
    pub source_file_no: u32,
    pub channel: u16,
    /// Epoch seconds.
    pub start_time: u32,
    /// Epoch seconds.
    pub end_time: u32,
    /// Bytes to extract, after any thumbnail cap.
    pub size: u64,
    /// Segment duration in seconds.
    pub play_time: u32,
}

/// Aggregate counters accumulated across the whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunTotals {
    pub files: u64,
    pub bytes: u64,
    pub seconds: u64,
}

impl RunTotals {
    /// Count one segment.
    pub fn add(&mut self, bytes: u64, seconds: u32) {
        self.files += 1;
        self.bytes += bytes;
        self.seconds += u64::from(seconds);
    }
}

/// Sink for user-facing run output.
pub trait Report {
    /// A segment was listed or selected for extraction.
    fn segment(&mut self, entry: &SegmentEntry);
    /// A per-segment notice (skip, overwrite, thumbnail failure).
    fn notice(&mut self, message: &str);
    /// Final aggregate totals, reported once per run in every mode.
    fn totals(&mut self, totals: &RunTotals);
}

/// Plain-text reporter writing to stdout.
pub struct ConsoleReport;

impl Report for ConsoleReport {
    fn segment(&mut self, entry: &SegmentEntry) {
        println!("File name: {}", entry.name);
        println!("File size: {} bytes", entry.size);
        println!("Play time: {} sec", entry.play_time);
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }

    fn totals(&mut self, totals: &RunTotals) {
        println!("Total files: {}", totals.files);
        println!(
            "Total file size: {} bytes (={} MB)",
            totals.bytes,
            totals.bytes / 1024 / 1024
        );
        println!(
            "Total play time: {} sec (={} min)",
            totals.seconds,
            totals.seconds / 60
        );
    }
}

/// JSON reporter: collects the listing and prints one document at the
/// end of the run. Notices are routed to the log instead of the
/// document.
#[derive(Default)]
pub struct JsonReport {
    segments: Vec<SegmentEntry>,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Report for JsonReport {
    fn segment(&mut self, entry: &SegmentEntry) {
        self.segments.push(entry.clone());
    }

    fn notice(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn totals(&mut self, totals: &RunTotals) {
        let document = serde_json::json!({
            "segments": self.segments,
            "totals": totals,
        });
        // Serializing plain structs cannot fail.
        println!(
            "{}",
            serde_json::to_string_pretty(&document).unwrap_or_default()
        );
    }
}
