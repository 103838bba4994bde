use crate::foundation::core::FrameIndex;
use crate::foundation::error::DirscapeResult;
use crate::matrix::model::MatrixSet;
use crate::timing::window::FrameWindow;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Rendering surface that turns one frame window into pixels.
///
/// Implementations may keep drawing state between calls (the driver never calls them
/// concurrently), but frame content must be a pure function of the arguments so camera motion
/// stays tied to the frame number.
pub trait SurfaceRenderer {
    /// Render `window` of `matrices` for frame `frame`.
    fn render_frame(
        &mut self,
        frame: FrameIndex,
        window: &FrameWindow,
        matrices: &MatrixSet,
    ) -> DirscapeResult<FrameRGBA>;
}

impl<F> SurfaceRenderer for F
where
    F: FnMut(FrameIndex, &FrameWindow, &MatrixSet) -> DirscapeResult<FrameRGBA>,
{
    fn render_frame(
        &mut self,
        frame: FrameIndex,
        window: &FrameWindow,
        matrices: &MatrixSet,
    ) -> DirscapeResult<FrameRGBA> {
        self(frame, window, matrices)
    }
}
