use std::path::PathBuf;

use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Resolved timing contract for one run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimingPlan {
    /// Effective video duration in seconds.
    pub duration_seconds: f64,
    /// Frames per second.
    pub fps: u32,
    /// `max(1, round(duration_seconds * fps))`.
    pub num_frames: u64,
    /// Audio to combine with the rendered video, if any.
    pub audio_path: Option<PathBuf>,
}

impl TimingPlan {
    /// Attach an audio track to the plan.
    pub fn with_audio(mut self, audio_path: Option<PathBuf>) -> Self {
        self.audio_path = audio_path;
        self
    }

    /// Length of the encoded video, `num_frames / fps`.
    ///
    /// Differs from `duration_seconds` by the frame rounding.
    pub fn encoded_seconds(&self) -> f64 {
        self.num_frames as f64 / f64::from(self.fps)
    }
}

/// Default-duration constants used when neither an explicit nor an audio duration is given.
///
/// `duration = clamp(base_secs + file_count * secs_per_file, min_secs, max_secs)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationPolicy {
    /// Duration before any file is counted.
    pub base_secs: f64,
    /// Added per file.
    pub secs_per_file: f64,
    /// Lower clamp.
    pub min_secs: f64,
    /// Upper clamp.
    pub max_secs: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            base_secs: 10.0,
            secs_per_file: 0.1,
            min_secs: 10.0,
            max_secs: 60.0,
        }
    }
}

impl DurationPolicy {
    /// Reject policies that cannot produce a positive duration.
    pub fn validate(&self) -> DirscapeResult<()> {
        let all_finite = [
            self.base_secs,
            self.secs_per_file,
            self.min_secs,
            self.max_secs,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(DirscapeError::invalid_config(
                "duration policy values must be finite",
            ));
        }
        if self.min_secs <= 0.0 || self.max_secs < self.min_secs {
            return Err(DirscapeError::invalid_config(
                "duration policy requires 0 < min_secs <= max_secs",
            ));
        }
        Ok(())
    }

    /// Default duration for `file_count` files.
    pub fn default_duration(&self, file_count: usize) -> f64 {
        (self.base_secs + file_count as f64 * self.secs_per_file)
            .clamp(self.min_secs, self.max_secs)
    }
}

/// Reconciles file count, explicit duration and audio length into one frame count.
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationResolver {
    policy: DurationPolicy,
}

impl DurationResolver {
    /// Create a resolver with a custom default-duration policy.
    pub fn new(policy: DurationPolicy) -> DirscapeResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Resolve the timing plan.
    ///
    /// Priority: `explicit_duration`, then `audio_duration`, then the policy default. The audio
    /// itself is never trimmed or padded here; the muxer reconciles it with the video length.
    #[tracing::instrument(skip(self))]
    pub fn resolve(
        &self,
        file_count: usize,
        explicit_duration: Option<f64>,
        audio_duration: Option<f64>,
        fps: u32,
    ) -> DirscapeResult<TimingPlan> {
        if fps == 0 {
            return Err(DirscapeError::invalid_config("fps must be > 0"));
        }

        let (duration_seconds, origin) = match (explicit_duration, audio_duration) {
            (Some(d), _) => (d, "explicit"),
            (None, Some(d)) => (d, "audio"),
            (None, None) => (self.policy.default_duration(file_count), "default"),
        };
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(DirscapeError::invalid_config(format!(
                "{origin} duration must be a positive number of seconds (got {duration_seconds})"
            )));
        }

        let num_frames = (duration_seconds * f64::from(fps)).round().max(1.0) as u64;
        tracing::debug!(duration_seconds, origin, num_frames, "timing resolved");

        Ok(TimingPlan {
            duration_seconds,
            fps,
            num_frames,
            audio_path: None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/duration.rs"]
mod tests;
