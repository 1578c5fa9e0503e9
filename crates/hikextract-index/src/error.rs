//! Error types for hikextract-index.

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while reading an index file.
///
/// Both variants are fatal to the run: the index format has no resync
/// points, so a short read means everything after it is unreadable.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The index ended before a complete record could be read.
    #[error("truncated index: needed {need} bytes for {what}")]
    Truncated { what: &'static str, need: usize },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
