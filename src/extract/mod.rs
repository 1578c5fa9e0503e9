//! Byte-range extraction of validated segments.

mod engine;
pub mod thumbnail;

pub use engine::{Engine, ExtractOptions, THUMBNAIL_BYTE_CAP};

use std::path::PathBuf;

/// Terminal run mode, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// List matching segments without touching container files.
    List,
    /// Accumulate and print totals only.
    Totals,
    /// Extract full video clips.
    ExtractVideo,
    /// Extract size-capped prefixes and hand them to the thumbnail tool.
    ExtractThumbs,
}

impl Mode {
    /// Whether this mode writes output files.
    pub fn extracts(self) -> bool {
        matches!(self, Mode::ExtractVideo | Mode::ExtractThumbs)
    }

    /// Whether per-segment lines are reported.
    pub fn lists(self) -> bool {
        !matches!(self, Mode::Totals)
    }
}

/// Errors that abort an extraction run.
///
/// Containment violations and thumbnail-tool failures are deliberately
/// absent: they are per-segment diagnostics, not run failures.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The index could not be decoded.
    #[error("index error: {0}")]
    Index(#[from] hikextract_index::IndexError),

    /// An I/O error occurred on a container or output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A container file ended before the segment's byte range did.
    #[error("source container truncated: {}", path.display())]
    SourceTruncated { path: PathBuf },

    /// Extraction was requested without an output directory.
    #[error("extraction requested but no output directory was given")]
    MissingOutputDir,

    /// Thumbnail mode was requested without a thumbnail tool.
    #[error("thumbnail mode requires a thumbnail tool")]
    MissingThumbnailer,
}
