//! Single-frame thumbnail generation via an external tool.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Errors from the thumbnail tool.
///
/// These never abort the run; the engine reports them per segment.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    /// The tool is not installed or not on PATH.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The tool ran but exited with a failure status.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// An I/O error occurred while invoking the tool.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Produces a single representative image from an extracted clip.
pub trait Thumbnailer {
    fn generate(&self, source: &Path, dest: &Path) -> Result<(), ThumbnailError>;
}

/// ffmpeg-backed implementation: grabs the first video frame.
#[derive(Debug, Clone)]
pub struct FfmpegThumbnailer {
    program: PathBuf,
}

impl FfmpegThumbnailer {
    /// Locate ffmpeg on PATH.
    pub fn locate() -> Result<Self, ThumbnailError> {
        let program = which::which("ffmpeg").map_err(|_| ThumbnailError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        })?;
        Ok(Self { program })
    }

    /// Use an explicit ffmpeg binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Thumbnailer for FfmpegThumbnailer {
    fn generate(&self, source: &Path, dest: &Path) -> Result<(), ThumbnailError> {
        tracing::debug!(
            source = %source.display(),
            dest = %dest.display(),
            "invoking ffmpeg"
        );

        let output = Command::new(&self.program)
            .args(["-y", "-i"])
            .arg(source)
            .args(["-vframes", "1", "-an"])
            .arg(dest)
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    ThumbnailError::ToolNotFound {
                        tool: "ffmpeg".to_string(),
                    }
                } else {
                    ThumbnailError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ThumbnailError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
