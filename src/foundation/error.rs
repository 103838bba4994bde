use std::path::Path;

/// Convenience result alias used across the crate.
pub type DirscapeResult<T> = Result<T, DirscapeError>;

/// Error taxonomy for the dirscape pipeline.
///
/// Per-file variants (`FileAccess`, `Decode`, `Parse`) are contained by the batch builder and never
/// abort a run. `InvalidConfig`, `Encode` and `Render` are terminal.
#[derive(thiserror::Error, Debug)]
pub enum DirscapeError {
    /// A file could not be read.
    #[error("file access error: {0}")]
    FileAccess(String),

    /// Image bytes did not decode for their extension.
    #[error("decode error: {0}")]
    Decode(String),

    /// Numeric text could not be parsed into a rectangular grid.
    #[error("parse error: {0}")]
    Parse(String),

    /// Non-positive fps/duration or otherwise unusable settings.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The video encoder failed; no artifact exists.
    #[error("encode error: {0}")]
    Encode(String),

    /// The rendering surface failed to produce a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped context error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DirscapeError {
    /// Build a [`DirscapeError::FileAccess`] naming the offending path.
    pub fn file_access(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::FileAccess(format!("'{}': {err}", path.display()))
    }

    /// Build a [`DirscapeError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`DirscapeError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`DirscapeError::InvalidConfig`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`DirscapeError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`DirscapeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// `true` for errors that only affect a single file and must not stop a batch.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileAccess(_) | Self::Decode(_) | Self::Parse(_))
    }
}

/// Non-fatal report that the audio track could not be combined with the video.
///
/// The run still succeeds with the silent artifact.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AudioMuxWarning {
    /// Audio file that was requested.
    pub audio_path: String,
    /// Reason reported by the muxer.
    pub reason: String,
}

impl std::fmt::Display for AudioMuxWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "audio '{}' was not muxed, output is silent: {}",
            self.audio_path, self.reason
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
