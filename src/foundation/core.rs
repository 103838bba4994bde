use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Absolute 0-based frame index in the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    ///
    /// Dimensions must be non-zero and fit the `u16` surfaces used by the CPU renderer.
    pub fn new(width: u32, height: u32) -> DirscapeResult<Self> {
        if width == 0 || height == 0 {
            return Err(DirscapeError::invalid_config(
                "canvas width/height must be non-zero",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(DirscapeError::invalid_config(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// `true` when both dimensions are even (required for yuv420p output).
    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
