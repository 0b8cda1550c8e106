//! glass-level CLI — feed a directory of decoded grayscale frames through
//! the fill-level pipeline and report one JSON line per frame.
//!
//! This binary is a harness around the library crates: it is the only place
//! in the workspace that reads files. Frames are consumed in lexicographic
//! order, standing in for the arrival order of a live feed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use glass_level::{LevelPipeline, PipelineParams};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "glass-level")]
#[command(about = "Detect a glass vessel in a frame sequence and track its fill level")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a directory of grayscale PNG frames.
    Run(RunArgs),

    /// Print the default pipeline parameters as JSON.
    Params,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Directory containing the frame sequence (*.png, lexicographic order).
    #[arg(long)]
    frames: PathBuf,

    /// Pipeline parameters (JSON). Defaults are used when omitted.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Store the glass crop as the empty-glass reference this many frames
    /// after detection latches.
    #[arg(long, default_value = "1")]
    reference_delay: usize,

    /// Write JSON lines here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    glass_level::init_with_level(level)?;

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Params => {
            println!(
                "{}",
                serde_json::to_string_pretty(&PipelineParams::default())?
            );
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> CliResult<()> {
    let params = match &args.params {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => PipelineParams::default(),
    };
    let mut pipeline = LevelPipeline::new(params);

    let mut sink: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let frames = frame_paths(&args.frames)?;
    if frames.is_empty() {
        return Err(format!("no PNG frames found in {}", args.frames.display()).into());
    }
    log::info!("processing {} frames from {}", frames.len(), args.frames.display());

    let mut frames_since_latch: Option<usize> = None;
    for (index, path) in frames.iter().enumerate() {
        let frame = image::open(path)?.to_luma8();
        let update = pipeline.process(&frame)?;

        if update.detected {
            let since = frames_since_latch.map_or(0, |n| n + 1);
            frames_since_latch = Some(since);
            if since == args.reference_delay && !pipeline.reference_set() {
                pipeline.set_reference_from_glass();
            }
        }

        let record = serde_json::json!({
            "frame": index,
            "file": path.file_name().and_then(|n| n.to_str()),
            "update": update,
        });
        writeln!(sink, "{record}")?;
    }

    Ok(())
}

fn frame_paths(dir: &PathBuf) -> CliResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_args_parse() {
        let cli = Cli::parse_from([
            "glass-level",
            "run",
            "--frames",
            "frames/",
            "--reference-delay",
            "3",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.reference_delay, 3);
        assert!(args.params.is_none());
    }
}
