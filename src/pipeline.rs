use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::animation::driver::{
    AnimationDriver, FfmpegSinkFactory, SinkFactory, VideoArtifact, VideoSettings,
};
use crate::audio::probe::probe_audio_duration;
use crate::encode::ffmpeg::{ensure_parent_dir, flatten_to_opaque_rgba8};
use crate::encode::mux::{AudioMuxer, FfmpegAudioMuxer};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::matrix::builder::{BuildThreading, MatrixBuildOpts, MatrixBuilder};
use crate::render::cpu::{CpuRendererOpts, CpuSurfaceRenderer};
use crate::scan::{ScanOpts, scan_directory};
use crate::timing::duration::{DurationPolicy, DurationResolver, TimingPlan};
use crate::timing::window::{FrameWindowScheduler, WindowPolicy};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "file_visualization.mp4";

/// Everything needed for one directory-to-video run.
#[derive(Clone, Debug)]
pub struct VisualizeConfig {
    /// Directory to visualize.
    pub root: PathBuf,
    /// MP4 output, or PNG output when `preview_frame` is set.
    pub output: PathBuf,
    /// Cap on the number of files taken from the scan.
    pub max_files: Option<usize>,
    /// Audio track to sync the video to.
    pub audio: Option<PathBuf>,
    /// Explicit duration in seconds; wins over the audio length.
    pub duration: Option<f64>,
    /// Frames per second.
    pub fps: u32,
    /// Video bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Output size.
    pub canvas: Canvas,
    /// Worker threads for the matrix build; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Render only this frame as a PNG.
    pub preview_frame: Option<u64>,
    /// File conversion limits.
    pub build: MatrixBuildOpts,
    /// Default-duration constants.
    pub duration_policy: DurationPolicy,
    /// Trailing window shape.
    pub window: WindowPolicy,
    /// Camera and drawing options; the canvas is taken from `canvas`.
    pub renderer: CpuRendererOpts,
}

impl VisualizeConfig {
    /// Defaults for visualizing `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_files: ScanOpts::default().max_files,
            audio: None,
            duration: None,
            fps: 15,
            bitrate_kbps: 5000,
            canvas: Canvas::default(),
            threads: None,
            preview_frame: None,
            build: MatrixBuildOpts::default(),
            duration_policy: DurationPolicy::default(),
            window: WindowPolicy::default(),
            renderer: CpuRendererOpts::default(),
        }
    }

    /// Check every setting before any file is touched.
    pub fn validate(&self) -> DirscapeResult<()> {
        if !self.root.is_dir() {
            return Err(DirscapeError::invalid_config(format!(
                "'{}' is not a directory",
                self.root.display()
            )));
        }
        if self.fps == 0 {
            return Err(DirscapeError::invalid_config("fps must be > 0"));
        }
        if self.bitrate_kbps == 0 {
            return Err(DirscapeError::invalid_config("bitrate must be > 0"));
        }
        if let Some(d) = self.duration
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(DirscapeError::invalid_config(format!(
                "duration must be a positive number of seconds (got {d})"
            )));
        }
        if self.max_files == Some(0) {
            return Err(DirscapeError::invalid_config("max files must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(DirscapeError::invalid_config("threads must be >= 1"));
        }
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.preview_frame.is_none() && !self.canvas.is_even() {
            return Err(DirscapeError::invalid_config(
                "video width/height must be even",
            ));
        }
        self.duration_policy.validate()?;
        self.window.validate()?;
        Ok(())
    }
}

/// What a run did, for the log line and `--summary-json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunSummary {
    /// Directory that was visualized.
    pub root: PathBuf,
    /// Files found before the cap.
    pub discovered: usize,
    /// Files taken from the scan.
    pub considered: usize,
    /// Files that produced a matrix.
    pub processed: usize,
    /// Processed files that fell back to the synthetic matrix.
    pub fallbacks: usize,
    /// Files that could not be read.
    pub skipped: usize,
    /// Bytes across all discovered files.
    pub total_bytes: u64,
    /// Resolved timing.
    pub timing: TimingPlan,
    /// Encoded video, when not previewing.
    pub video: Option<VideoArtifact>,
    /// Written PNG, when previewing.
    pub preview: Option<PathBuf>,
    /// Non-fatal problems worth surfacing.
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// One-line human summary.
    pub fn summary_line(&self) -> String {
        format!(
            "processed {} of {} files ({} fell back to synthetic representation)",
            self.processed, self.considered, self.fallbacks
        )
    }

    /// Path of whatever the run produced.
    pub fn output_path(&self) -> Option<&Path> {
        self.video
            .as_ref()
            .map(|v| v.path.as_path())
            .or(self.preview.as_deref())
    }
}

/// Run the full pipeline with the `ffmpeg` encoder and muxer.
pub fn run_visualization(cfg: &VisualizeConfig) -> DirscapeResult<RunSummary> {
    let mut sinks = FfmpegSinkFactory {
        bg_rgba: cfg.renderer.clear_rgba,
    };
    run_visualization_with(cfg, &mut sinks, &FfmpegAudioMuxer)
}

/// Run the full pipeline with injected encoding collaborators.
#[tracing::instrument(skip_all, fields(root = %cfg.root.display()))]
pub fn run_visualization_with(
    cfg: &VisualizeConfig,
    sinks: &mut dyn SinkFactory,
    muxer: &dyn AudioMuxer,
) -> DirscapeResult<RunSummary> {
    cfg.validate()?;
    let mut warnings = Vec::new();

    let scan = scan_directory(
        &cfg.root,
        &ScanOpts {
            max_files: cfg.max_files,
            ..ScanOpts::default()
        },
    )?;
    if scan.records.is_empty() {
        return Err(DirscapeError::invalid_config(format!(
            "no files found under '{}'",
            cfg.root.display()
        )));
    }
    for path in &scan.unreadable {
        warnings.push(format!("could not read '{}' while scanning", path.display()));
    }

    let report = MatrixBuilder::new(cfg.build.clone()).build_all(
        &scan.records,
        &BuildThreading {
            parallel: true,
            threads: cfg.threads,
        },
    )?;
    if report.matrices.is_empty() {
        return Err(DirscapeError::invalid_config(format!(
            "none of the {} files under '{}' could be processed",
            scan.records.len(),
            cfg.root.display()
        )));
    }

    let audio_duration = match &cfg.audio {
        Some(audio) if cfg.duration.is_none() => match probe_audio_duration(audio) {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::warn!(error = %e, "could not measure audio length, using default duration");
                warnings.push(format!("audio length unknown: {e}"));
                None
            }
        },
        _ => None,
    };

    let timing = DurationResolver::new(cfg.duration_policy)?
        .resolve(report.matrices.len(), cfg.duration, audio_duration, cfg.fps)?
        .with_audio(cfg.audio.clone());
    tracing::info!(
        duration = timing.duration_seconds,
        frames = timing.num_frames,
        fps = timing.fps,
        "timing resolved"
    );

    let renderer_opts = cfg.renderer.with_canvas(cfg.canvas);
    let mut renderer = CpuSurfaceRenderer::new(renderer_opts)?;
    let driver = AnimationDriver::new(FrameWindowScheduler::new(cfg.window)?);

    let (video, preview) = match cfg.preview_frame {
        Some(frame) => {
            let rgba = driver.render_single(
                FrameIndex(frame),
                &report.matrices,
                &timing,
                &mut renderer,
            )?;
            write_png(&cfg.output, &rgba, renderer_opts.clear_rgba)?;
            (None, Some(cfg.output.clone()))
        }
        None => {
            let settings = VideoSettings {
                width: cfg.canvas.width,
                height: cfg.canvas.height,
                bitrate_kbps: cfg.bitrate_kbps,
            };
            let artifact = driver.produce_video(
                &report.matrices,
                &timing,
                &mut renderer,
                &settings,
                sinks,
                muxer,
                &cfg.output,
            )?;
            if let Some(w) = &artifact.warning {
                warnings.push(w.to_string());
            }
            (Some(artifact), None)
        }
    };

    let summary = RunSummary {
        root: cfg.root.clone(),
        discovered: scan.discovered,
        considered: scan.records.len(),
        processed: report.processed(),
        fallbacks: report.fallbacks(),
        skipped: report.skipped(),
        total_bytes: scan.total_bytes,
        timing,
        video,
        preview,
        warnings,
    };
    tracing::info!("{}", summary.summary_line());
    Ok(summary)
}

fn write_png(
    path: &Path,
    frame: &crate::render::backend::FrameRGBA,
    bg_rgba: [u8; 4],
) -> DirscapeResult<()> {
    ensure_parent_dir(path)?;
    let mut opaque = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut opaque, &frame.data, frame.premultiplied, bg_rgba)?;
    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
