use clap::Parser;
use std::path::PathBuf;

use hikextract::extract::Mode;

#[derive(Parser)]
#[command(name = "hikextract")]
#[command(author, version, about = "Read and extract Hikvision DVR video file storage")]
pub struct Cli {
    /// Input directory containing index00.bin and hivNNNNN.mp4 files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for extracted files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only handle segments whose output name contains this string
    #[arg(short = 's', long = "match", value_name = "SUBSTRING")]
    pub match_filter: Option<String>,

    /// Don't overwrite existing output files
    #[arg(short = 'k', long)]
    pub skip_existing: bool,

    /// List matching segments, don't extract data
    #[arg(short, long)]
    pub list: bool,

    /// Only calculate and show totals
    #[arg(short, long)]
    pub totals: bool,

    /// Only create thumbnail pics
    #[arg(short = 'p', long)]
    pub thumbs: bool,

    /// Emit listing and totals as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The run mode, fixed once at startup.
    pub fn mode(&self) -> Mode {
        if self.totals {
            Mode::Totals
        } else if self.list {
            Mode::List
        } else if self.thumbs {
            Mode::ExtractThumbs
        } else {
            Mode::ExtractVideo
        }
    }
}
