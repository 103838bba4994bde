use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::mux::AudioMuxer;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AudioMuxWarning, DirscapeError, DirscapeResult};
use crate::matrix::model::MatrixSet;
use crate::render::backend::{FrameRGBA, SurfaceRenderer};
use crate::timing::duration::TimingPlan;
use crate::timing::window::FrameWindowScheduler;

/// Encoder settings that do not come from the [`TimingPlan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoSettings {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target video bitrate in kbit/s.
    pub bitrate_kbps: u32,
}

impl VideoSettings {
    fn sink_config(&self, timing: &TimingPlan) -> SinkConfig {
        SinkConfig {
            width: self.width,
            height: self.height,
            fps: timing.fps,
            bitrate_kbps: self.bitrate_kbps,
        }
    }
}

/// Opens a [`FrameSink`] that writes a video file at a given path.
pub trait SinkFactory {
    /// Create a sink targeting `out_path`.
    fn create(&mut self, out_path: &Path) -> DirscapeResult<Box<dyn FrameSink>>;
}

impl<F> SinkFactory for F
where
    F: FnMut(&Path) -> DirscapeResult<Box<dyn FrameSink>>,
{
    fn create(&mut self, out_path: &Path) -> DirscapeResult<Box<dyn FrameSink>> {
        self(out_path)
    }
}

/// [`SinkFactory`] producing [`FfmpegSink`]s.
#[derive(Clone, Copy, Debug)]
pub struct FfmpegSinkFactory {
    /// Background used to flatten alpha.
    pub bg_rgba: [u8; 4],
}

impl SinkFactory for FfmpegSinkFactory {
    fn create(&mut self, out_path: &Path) -> DirscapeResult<Box<dyn FrameSink>> {
        let opts = FfmpegSinkOpts::new(out_path).with_background(self.bg_rgba);
        Ok(Box::new(FfmpegSink::new(opts)))
    }
}

/// Final video produced by [`AnimationDriver::produce_video`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoArtifact {
    /// Location of the finished video.
    pub path: PathBuf,
    /// Frames encoded.
    pub frames: u64,
    /// Whether the audio track was combined into the video.
    pub muxed_audio: bool,
    /// Set when audio was requested but could not be combined.
    pub warning: Option<AudioMuxWarning>,
}

/// Walks every frame of a [`TimingPlan`], asking the scheduler for the visible window and the
/// renderer for pixels.
///
/// Frames are produced one at a time, in increasing order, on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationDriver {
    scheduler: FrameWindowScheduler,
}

impl AnimationDriver {
    /// Driver using `scheduler` for windowing.
    pub fn new(scheduler: FrameWindowScheduler) -> Self {
        Self { scheduler }
    }

    /// Scheduler in use.
    pub fn scheduler(&self) -> &FrameWindowScheduler {
        &self.scheduler
    }

    /// Render every frame and collect the results.
    #[tracing::instrument(skip_all, fields(frames = timing.num_frames, matrices = matrices.len()))]
    pub fn run(
        &self,
        matrices: &MatrixSet,
        timing: &TimingPlan,
        renderer: &mut dyn SurfaceRenderer,
    ) -> DirscapeResult<Vec<FrameRGBA>> {
        let mut out = Vec::with_capacity(timing.num_frames.min(4096) as usize);
        self.for_each_frame(matrices, timing, renderer, |_, frame| {
            out.push(frame);
            Ok(())
        })?;
        Ok(out)
    }

    /// Render a single frame, for previews.
    pub fn render_single(
        &self,
        frame: FrameIndex,
        matrices: &MatrixSet,
        timing: &TimingPlan,
        renderer: &mut dyn SurfaceRenderer,
    ) -> DirscapeResult<FrameRGBA> {
        if frame.0 >= timing.num_frames {
            return Err(DirscapeError::invalid_config(format!(
                "frame {} is outside the animation (0..{})",
                frame.0, timing.num_frames
            )));
        }
        let window = self.scheduler.window(frame.0, timing, matrices.len());
        renderer.render_frame(frame, &window, matrices)
    }

    /// Render every frame straight into `sink`. Returns the number of frames pushed.
    #[tracing::instrument(skip_all, fields(frames = timing.num_frames))]
    pub fn run_into_sink(
        &self,
        matrices: &MatrixSet,
        timing: &TimingPlan,
        renderer: &mut dyn SurfaceRenderer,
        settings: &VideoSettings,
        sink: &mut dyn FrameSink,
    ) -> DirscapeResult<u64> {
        sink.begin(settings.sink_config(timing))?;
        let mut pushed = 0u64;
        self.for_each_frame(matrices, timing, renderer, |idx, frame| {
            sink.push_frame(idx, &frame)?;
            pushed += 1;
            Ok(())
        })?;
        sink.end()?;
        Ok(pushed)
    }

    /// Render and encode the animation to `out_path`, then attach `timing.audio_path` if set.
    ///
    /// With audio, the silent encode goes to a temporary file next to `out_path` and is handed
    /// to `muxer`. A muxer failure is not fatal: the silent video is moved to `out_path` and the
    /// artifact carries an [`AudioMuxWarning`]. The temporary file never outlives this call.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip_all, fields(out = %out_path.display()))]
    pub fn produce_video(
        &self,
        matrices: &MatrixSet,
        timing: &TimingPlan,
        renderer: &mut dyn SurfaceRenderer,
        settings: &VideoSettings,
        sinks: &mut dyn SinkFactory,
        muxer: &dyn AudioMuxer,
        out_path: &Path,
    ) -> DirscapeResult<VideoArtifact> {
        ensure_parent_dir(out_path)?;

        let Some(audio) = timing.audio_path.as_deref() else {
            let mut sink = sinks.create(out_path)?;
            let frames = self.run_into_sink(matrices, timing, renderer, settings, sink.as_mut())?;
            return Ok(VideoArtifact {
                path: out_path.to_path_buf(),
                frames,
                muxed_audio: false,
                warning: None,
            });
        };

        let silent = silent_artifact_path(out_path);
        let mut silent_guard = TempFileGuard(Some(silent.clone()));
        let frames = {
            let mut sink = sinks.create(&silent)?;
            self.run_into_sink(matrices, timing, renderer, settings, sink.as_mut())?
        };

        match muxer.mux(&silent, audio, out_path, timing.encoded_seconds()) {
            Ok(()) => {
                tracing::info!(audio = %audio.display(), "audio muxed");
                Ok(VideoArtifact {
                    path: out_path.to_path_buf(),
                    frames,
                    muxed_audio: true,
                    warning: None,
                })
            }
            Err(err) => {
                let warning = AudioMuxWarning {
                    audio_path: audio.display().to_string(),
                    reason: err.to_string(),
                };
                tracing::warn!("{warning}");
                move_file(&silent, out_path)?;
                silent_guard.0 = None;
                Ok(VideoArtifact {
                    path: out_path.to_path_buf(),
                    frames,
                    muxed_audio: false,
                    warning: Some(warning),
                })
            }
        }
    }

    fn for_each_frame(
        &self,
        matrices: &MatrixSet,
        timing: &TimingPlan,
        renderer: &mut dyn SurfaceRenderer,
        mut emit: impl FnMut(FrameIndex, FrameRGBA) -> DirscapeResult<()>,
    ) -> DirscapeResult<()> {
        if timing.num_frames == 0 {
            return Err(DirscapeError::invalid_config("timing plan has no frames"));
        }
        let count = matrices.len();
        for f in 0..timing.num_frames {
            let window = self.scheduler.window(f, timing, count);
            let frame = renderer.render_frame(FrameIndex(f), &window, matrices)?;
            emit(FrameIndex(f), frame)?;
            if f.is_multiple_of(100) {
                tracing::debug!(frame = f, of = timing.num_frames, "rendered");
            }
        }
        Ok(())
    }
}

fn silent_artifact_path(out_path: &Path) -> PathBuf {
    let stem = out_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    out_path.with_file_name(format!(
        ".{stem}.silent.{}.{}.mp4",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn move_file(from: &Path, to: &Path) -> DirscapeResult<()> {
    use anyhow::Context as _;

    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).with_context(|| {
        format!(
            "failed to move silent video '{}' to '{}'",
            from.display(),
            to.display()
        )
    })?;
    let _ = std::fs::remove_file(from);
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
