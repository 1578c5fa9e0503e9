//! The extraction engine.
//!
//! Drives one linear pass over the index, turning each validated
//! (file, segment) pair into a listing line, a totals contribution,
//! and — in the extract modes — an output file produced by a bounded
//! streaming copy of the segment's byte range.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use hikextract_index::{FileRecord, IndexReader, ReaderOptions, SegmentRecord, INDEX_FILE_NAME};

use crate::extract::thumbnail::Thumbnailer;
use crate::extract::{ExtractError, Mode};
use crate::naming::{
    container_file_name, segment_file_name, OUTPUT_PREFIX, THUMBNAIL_EXTENSION, VIDEO_EXTENSION,
};
use crate::report::{Report, RunTotals, SegmentEntry};

/// Thumbnail mode copies at most this many bytes of a segment. The
/// first frame of interest is assumed to lie within that prefix.
pub const THUMBNAIL_BYTE_CAP: u64 = 1_000_000;

/// Streaming copy chunk size.
const COPY_CHUNK: usize = 8 * 1024;

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory holding `index00.bin` and the `hivNNNNN.mp4` files.
    pub input_dir: PathBuf,
    /// Destination directory; required by the extract modes.
    pub output_dir: Option<PathBuf>,
    pub mode: Mode,
    /// Substring filter applied to output file names.
    pub match_filter: Option<String>,
    /// Leave existing destination files untouched.
    pub skip_existing: bool,
    pub reader: ReaderOptions,
}

/// One extraction run over one index file.
pub struct Engine<'a> {
    options: ExtractOptions,
    report: &'a mut dyn Report,
    thumbnailer: Option<&'a dyn Thumbnailer>,
    totals: RunTotals,
}

impl<'a> Engine<'a> {
    pub fn new(options: ExtractOptions, report: &'a mut dyn Report) -> Self {
        Self {
            options,
            report,
            thumbnailer: None,
            totals: RunTotals::default(),
        }
    }

    /// Attach the tool used in thumbnail mode.
    pub fn with_thumbnailer(mut self, thumbnailer: &'a dyn Thumbnailer) -> Self {
        self.thumbnailer = Some(thumbnailer);
        self
    }

    /// Execute the run and report totals.
    pub fn run(mut self) -> Result<RunTotals, ExtractError> {
        if self.options.mode.extracts() && self.options.output_dir.is_none() {
            return Err(ExtractError::MissingOutputDir);
        }
        if self.options.mode == Mode::ExtractThumbs && self.thumbnailer.is_none() {
            return Err(ExtractError::MissingThumbnailer);
        }

        let index_path = self.options.input_dir.join(INDEX_FILE_NAME);
        tracing::info!(path = %index_path.display(), "reading index");

        let index_file = File::open(&index_path)?;
        let reader =
            IndexReader::with_options(BufReader::new(index_file), self.options.reader.clone())?;

        reader.visit_segments(|file, slot, segment| self.handle(file, slot, segment))?;

        self.report.totals(&self.totals);
        Ok(self.totals)
    }

    fn handle(
        &mut self,
        file: &FileRecord,
        _slot: usize,
        segment: SegmentRecord,
    ) -> Result<(), ExtractError> {
        let extension = if self.options.mode == Mode::ExtractThumbs {
            THUMBNAIL_EXTENSION
        } else {
            VIDEO_EXTENSION
        };
        let name = segment_file_name(
            OUTPUT_PREFIX,
            extension,
            file.channel,
            segment.start_time,
            segment.end_time,
        );

        if let Some(filter) = &self.options.match_filter {
            if !name.contains(filter.as_str()) {
                return Ok(());
            }
        }

        let mut size = segment.byte_len();
        if self.options.mode == Mode::ExtractThumbs && size > THUMBNAIL_BYTE_CAP {
            size = THUMBNAIL_BYTE_CAP;
        }

        if self.options.mode.lists() {
            self.report.segment(&SegmentEntry {
                name: name.clone(),
                source_file_no: file.file_no,
                channel: file.channel,
                start_time: segment.start_time,
                end_time: segment.end_time,
                size,
                play_time: segment.play_time(),
            });
        }
        self.totals.add(size, segment.play_time());

        if !self.options.mode.extracts() {
            return Ok(());
        }

        // Presence checked in run().
        let Some(output_dir) = self.options.output_dir.as_deref() else {
            return Err(ExtractError::MissingOutputDir);
        };
        let dest = output_dir.join(&name);

        if dest.exists() {
            if self.options.skip_existing {
                self.report.notice("File exists... Skipped!");
                return Ok(());
            }
            self.report.notice("File exists... Overwriting...");
        }

        let source = self.options.input_dir.join(container_file_name(file.file_no));
        if self.options.mode == Mode::ExtractThumbs {
            self.extract_thumbnail(&source, &dest, segment.start_offset, size)
        } else {
            extract_video(&source, &dest, segment.start_offset, size)
        }
    }

    fn extract_thumbnail(
        &mut self,
        source: &Path,
        dest: &Path,
        offset: u32,
        size: u64,
    ) -> Result<(), ExtractError> {
        let Some(thumbnailer) = self.thumbnailer else {
            return Err(ExtractError::MissingThumbnailer);
        };

        let staging_dir = dest.parent().unwrap_or(Path::new("."));
        let mut staging = tempfile::Builder::new()
            .prefix("hikextract-")
            .suffix(".mp4")
            .tempfile_in(staging_dir)?;

        {
            let mut input = open_at(source, offset)?;
            copy_exact(&mut input, staging.as_file_mut(), size, source)?;
        }

        // The staging clip is removed on drop whether or not the tool
        // succeeds; a tool failure costs only this one thumbnail.
        match thumbnailer.generate(staging.path(), dest) {
            Ok(()) => {
                tracing::info!(dest = %dest.display(), "thumbnail created");
            }
            Err(e) => {
                tracing::warn!(dest = %dest.display(), error = %e, "thumbnail generation failed");
                self.report.notice("Thumbnail generation failed... Skipped!");
            }
        }

        Ok(())
    }
}

fn extract_video(source: &Path, dest: &Path, offset: u32, size: u64) -> Result<(), ExtractError> {
    let mut input = open_at(source, offset)?;
    let mut output = File::create(dest)?;

    if let Err(e) = copy_exact(&mut input, &mut output, size, source) {
        // Partial output is treated as corrupt: drop the handle and
        // remove the fragment before surfacing the fatal error.
        drop(output);
        let _ = std::fs::remove_file(dest);
        return Err(e);
    }

    tracing::info!(dest = %dest.display(), size, "extracted segment");
    Ok(())
}

fn open_at(source: &Path, offset: u32) -> Result<File, ExtractError> {
    let mut file = File::open(source)?;
    file.seek(SeekFrom::Start(u64::from(offset)))?;
    Ok(file)
}

/// Copy exactly `remaining` bytes in bounded chunks, verifying every
/// read and write completes in full.
fn copy_exact<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    mut remaining: u64,
    source: &Path,
) -> Result<(), ExtractError> {
    let mut buf = [0u8; COPY_CHUNK];
    while remaining > 0 {
        let want = remaining.min(COPY_CHUNK as u64) as usize;
        input.read_exact(&mut buf[..want]).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                ExtractError::SourceTruncated {
                    path: source.to_path_buf(),
                }
            } else {
                ExtractError::Io(e)
            }
        })?;
        output.write_all(&buf[..want])?;
        remaining -= want as u64;
    }
    output.flush()?;
    Ok(())
}
