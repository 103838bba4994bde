use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::render::backend::FrameRGBA;

/// Stream parameters handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
    /// Target video bitrate in kbit/s.
    pub bitrate_kbps: u32,
}

impl SinkConfig {
    /// Reject zero dimensions, fps or bitrate.
    pub fn validate(&self) -> DirscapeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DirscapeError::invalid_config(
                "sink width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(DirscapeError::invalid_config("sink fps must be non-zero"));
        }
        if self.bitrate_kbps == 0 {
            return Err(DirscapeError::invalid_config(
                "sink bitrate must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Consumer of rendered frames in animation order.
///
/// `push_frame` is called with strictly increasing frame indices between one `begin` and `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DirscapeResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DirscapeResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> DirscapeResult<()>;
}

/// Sink that keeps every frame in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Consume the sink, returning the frames without their indices.
    pub fn into_frames(self) -> Vec<FrameRGBA> {
        self.frames.into_iter().map(|(_, f)| f).collect()
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DirscapeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DirscapeResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DirscapeResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
