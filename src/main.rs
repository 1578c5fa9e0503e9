mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

use hikextract::extract::thumbnail::FfmpegThumbnailer;
use hikextract::extract::{Engine, ExtractOptions, Mode};
use hikextract::report::{ConsoleReport, JsonReport, Report};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hikextract=debug,hikextract_index=debug".to_string()
        } else {
            "hikextract=info,hikextract_index=warn".to_string()
        }
    });

    // Diagnostics go to stderr; stdout is reserved for the reporter.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mode = cli.mode();
    let options = ExtractOptions {
        input_dir: cli.input.clone(),
        output_dir: cli.output.clone(),
        mode,
        match_filter: cli.match_filter.clone(),
        skip_existing: cli.skip_existing,
        reader: Default::default(),
    };

    let thumbnailer = if mode == Mode::ExtractThumbs {
        Some(FfmpegThumbnailer::locate().context("thumbnail mode requires ffmpeg on PATH")?)
    } else {
        None
    };

    let mut console = ConsoleReport;
    let mut json = JsonReport::new();
    let report: &mut dyn Report = if cli.json { &mut json } else { &mut console };

    let mut engine = Engine::new(options, report);
    if let Some(ref thumbnailer) = thumbnailer {
        engine = engine.with_thumbnailer(thumbnailer);
    }

    engine.run()?;
    Ok(())
}
