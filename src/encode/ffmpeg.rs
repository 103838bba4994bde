use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Overwrite an existing output file.
    pub overwrite: bool,
    /// Background used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Options writing an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }

    /// Return options with a different flatten background.
    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }
}

/// Silent H.264 MP4 encoder backed by the system `ffmpeg`.
///
/// Frames are flattened to opaque RGBA8 and streamed to `ffmpeg` stdin as rawvideo.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    /// Output path this sink writes.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DirscapeResult<()> {
        cfg.validate()?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DirscapeError::invalid_config(
                "video width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DirscapeError::invalid_config(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(DirscapeError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-b:v",
            &format!("{}k", cfg.bitrate_kbps),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&self.opts.out_path);

        tracing::debug!(out = %self.opts.out_path.display(), "spawning ffmpeg encoder");
        let mut child = cmd.spawn().map_err(|e| {
            DirscapeError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DirscapeError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DirscapeError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DirscapeResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| DirscapeError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(DirscapeError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(DirscapeError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DirscapeError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            DirscapeError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn end(&mut self) -> DirscapeResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| DirscapeError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| DirscapeError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DirscapeError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| DirscapeError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let _ = std::fs::remove_file(&self.opts.out_path);
            return Err(DirscapeError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // An unfinished encode leaves no artifact behind.
        if let Some(mut child) = self.child.take() {
            drop(self.stdin.take());
            let _ = child.kill();
            let _ = child.wait();
            let _ = std::fs::remove_file(&self.opts.out_path);
        }
    }
}

/// Composite RGBA8 pixels over an opaque background.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> DirscapeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DirscapeError::encode(
            "frame data size does not match width*height*4",
        ));
    }

    let [bg_r, bg_g, bg_b, _] = bg_rgba.map(u16::from);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        let ch = |c: u8, bg: u16| {
            let fg = if src_is_premul {
                u16::from(c)
            } else {
                mul_div255_u16(u16::from(c), a)
            };
            (fg + mul_div255_u16(bg, inv)).min(255) as u8
        };
        d[0] = ch(s[0], bg_r);
        d[1] = ch(s[1], bg_g);
        d[2] = ch(s[2], bg_b);
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DirscapeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

pub(crate) fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
