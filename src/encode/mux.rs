use std::path::Path;
use std::process::{Command, Stdio};

use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path};
use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Combines a silent video with an audio track.
pub trait AudioMuxer {
    /// Write `out` containing the video stream of `silent_video` and the audio of `audio`,
    /// lasting `duration_seconds`.
    fn mux(
        &self,
        silent_video: &Path,
        audio: &Path,
        out: &Path,
        duration_seconds: f64,
    ) -> DirscapeResult<()>;
}

impl<F> AudioMuxer for F
where
    F: Fn(&Path, &Path, &Path, f64) -> DirscapeResult<()>,
{
    fn mux(
        &self,
        silent_video: &Path,
        audio: &Path,
        out: &Path,
        duration_seconds: f64,
    ) -> DirscapeResult<()> {
        self(silent_video, audio, out, duration_seconds)
    }
}

/// [`AudioMuxer`] backed by the system `ffmpeg`.
///
/// The video stream is copied, audio is encoded to AAC, padded with silence when short and cut
/// at the video duration when long.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegAudioMuxer;

impl FfmpegAudioMuxer {
    pub(crate) fn command(
        silent_video: &Path,
        audio: &Path,
        out: &Path,
        duration_seconds: f64,
    ) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(["-y", "-loglevel", "error", "-i"])
            .arg(silent_video)
            .arg("-i")
            .arg(audio)
            .args([
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-af",
                "apad",
                "-t",
                &format!("{duration_seconds:.3}"),
                "-shortest",
                "-movflags",
                "+faststart",
            ])
            .arg(out);
        cmd
    }
}

impl AudioMuxer for FfmpegAudioMuxer {
    fn mux(
        &self,
        silent_video: &Path,
        audio: &Path,
        out: &Path,
        duration_seconds: f64,
    ) -> DirscapeResult<()> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(DirscapeError::invalid_config(
                "mux duration must be finite and > 0",
            ));
        }
        if !audio.is_file() {
            return Err(DirscapeError::file_access(audio, "audio file not found"));
        }
        if !is_ffmpeg_on_path() {
            return Err(DirscapeError::encode(
                "ffmpeg is required for audio muxing, but was not found on PATH",
            ));
        }
        ensure_parent_dir(out)?;

        let output = Self::command(silent_video, audio, out, duration_seconds)
            .output()
            .map_err(|e| DirscapeError::encode(format!("failed to run ffmpeg: {e}")))?;
        if !output.status.success() {
            let _ = std::fs::remove_file(out);
            return Err(DirscapeError::encode(format!(
                "ffmpeg mux exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mux.rs"]
mod tests;
