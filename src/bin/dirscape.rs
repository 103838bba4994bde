use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "dirscape",
    version,
    about = "Turn a directory tree into a flowing 3D animated video"
)]
struct Cli {
    /// Directory to visualize.
    root: PathBuf,

    /// Output path (MP4, or PNG with --frame).
    #[arg(short, long, default_value = dirscape::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Maximum number of files to process.
    #[arg(long, default_value_t = 100)]
    max_files: usize,

    /// Audio file to sync the video to.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Video duration in seconds; overrides the audio length.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long, default_value_t = 15)]
    fps: u32,

    /// Video bitrate in kbit/s.
    #[arg(long, default_value_t = 5000)]
    bitrate: u32,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Worker threads for file conversion.
    #[arg(long)]
    threads: Option<usize>,

    /// Render only this frame as a PNG (no ffmpeg needed).
    #[arg(long)]
    frame: Option<u64>,

    /// Write the run summary as JSON to this path.
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = dirscape::VisualizeConfig::new(&cli.root);
    cfg.output = cli.output;
    cfg.max_files = Some(cli.max_files);
    cfg.audio = cli.audio;
    cfg.duration = cli.duration;
    cfg.fps = cli.fps;
    cfg.bitrate_kbps = cli.bitrate;
    cfg.canvas = dirscape::Canvas::new(cli.width, cli.height)?;
    cfg.threads = cli.threads;
    cfg.preview_frame = cli.frame;

    let summary = dirscape::run_visualization(&cfg)
        .with_context(|| format!("visualize '{}'", cli.root.display()))?;

    eprintln!("{}", summary.summary_line());
    if summary.skipped > 0 {
        eprintln!("skipped {} unreadable files", summary.skipped);
    }
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
    if let Some(path) = summary.output_path() {
        eprintln!(
            "wrote {} ({} frames, {:.1}s at {} fps)",
            path.display(),
            summary.timing.num_frames,
            summary.timing.duration_seconds,
            summary.timing.fps
        );
    }

    if let Some(path) = &cli.summary_json {
        let json = serde_json::to_vec_pretty(&summary).context("serialize summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("write summary '{}'", path.display()))?;
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
