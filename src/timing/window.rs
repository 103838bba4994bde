use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::timing::duration::TimingPlan;

/// Matrices visible in one frame, oldest first, with their opacities.
///
/// `indices` is strictly increasing and `alphas` has the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameWindow {
    /// Matrix indices into the set.
    pub indices: Vec<usize>,
    /// Opacity of each index, in `[fade_floor, 1]`.
    pub alphas: Vec<f32>,
}

impl FrameWindow {
    /// Number of visible matrices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// `true` when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(index, alpha)` pairs, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.alphas.iter().copied())
    }
}

/// Window width and fade floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPolicy {
    /// Maximum number of matrices visible at once.
    pub width: usize,
    /// Opacity of the oldest visible matrix.
    pub fade_floor: f32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            width: 6,
            fade_floor: 0.2,
        }
    }
}

impl WindowPolicy {
    /// Reject a zero width or a floor outside `[0, 1]`.
    pub fn validate(&self) -> DirscapeResult<()> {
        if self.width == 0 {
            return Err(DirscapeError::invalid_config("window width must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.fade_floor) {
            return Err(DirscapeError::invalid_config(
                "window fade floor must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Maps a frame number to the trailing, fading window of matrices it shows.
///
/// The scheduler holds no animation state; each query depends only on its arguments.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameWindowScheduler {
    policy: WindowPolicy,
}

impl FrameWindowScheduler {
    /// Create a scheduler with a custom policy.
    pub fn new(policy: WindowPolicy) -> DirscapeResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Policy in use.
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Index of the newest visible matrix for `frame_num`.
    ///
    /// `floor(frame_num / num_frames * matrix_count)` clamped to the last matrix; the final
    /// frame is pinned to the last matrix. `None` when `matrix_count == 0`.
    pub fn current_index(
        &self,
        frame_num: u64,
        num_frames: u64,
        matrix_count: usize,
    ) -> Option<usize> {
        let last = matrix_count.checked_sub(1)?;
        let num_frames = num_frames.max(1);
        if frame_num >= num_frames - 1 {
            return Some(last);
        }
        let idx = u128::from(frame_num) * matrix_count as u128 / u128::from(num_frames);
        Some((idx as usize).min(last))
    }

    /// Window for `frame_num`.
    pub fn window(&self, frame_num: u64, timing: &TimingPlan, matrix_count: usize) -> FrameWindow {
        let Some(file_idx) = self.current_index(frame_num, timing.num_frames, matrix_count) else {
            return FrameWindow::default();
        };

        let width = self.policy.width.max(1).min(matrix_count);
        let start = file_idx.saturating_sub(width - 1);
        let end = (file_idx + 1).min(matrix_count);
        let len = end - start;

        let floor = self.policy.fade_floor;
        let denom = len.saturating_sub(1).max(1) as f32;
        let indices: Vec<usize> = (start..end).collect();
        let alphas = (0..len)
            .map(|pos| (floor + (1.0 - floor) * (pos as f32 / denom)).clamp(floor, 1.0))
            .collect();

        FrameWindow { indices, alphas }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/window.rs"]
mod tests;
