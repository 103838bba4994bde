//! dirscape turns a directory tree into a flowing 3D animated video.
//!
//! Every file becomes a bounded numeric matrix (image luminance, numeric text, or a
//! deterministic surface derived from file metadata). The matrices are streamed through a
//! trailing, fading window across the animation frames, rendered as 3D surfaces on the CPU, and
//! encoded to MP4 through the system `ffmpeg`, optionally synced to an audio track.
//!
//! - Scan a directory with [`scan_directory`]
//! - Convert files with [`MatrixBuilder`]
//! - Fix the frame count with [`DurationResolver`]
//! - Drive frames through a [`SurfaceRenderer`] with [`AnimationDriver`]
//!
//! [`run_visualization`] wires all of the above together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod audio;
pub(crate) mod encode;
pub(crate) mod matrix;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod scan;
pub(crate) mod timing;

pub use crate::foundation::core::{Canvas, FrameIndex};
pub use crate::foundation::error::{AudioMuxWarning, DirscapeError, DirscapeResult};

pub use crate::animation::driver::{
    AnimationDriver, FfmpegSinkFactory, SinkFactory, VideoArtifact, VideoSettings,
};
pub use crate::audio::probe::{is_ffprobe_on_path, probe_audio_duration};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::mux::{AudioMuxer, FfmpegAudioMuxer};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::matrix::builder::{
    BuildReport, BuildThreading, BuiltMatrix, FileClass, FileOutcome, MatrixBuildOpts,
    MatrixBuilder, MatrixSource, OutcomeStatus, synthetic_matrix,
};
pub use crate::matrix::model::{Matrix, MatrixSet, SceneBounds};
pub use crate::pipeline::{
    DEFAULT_OUTPUT, RunSummary, VisualizeConfig, run_visualization, run_visualization_with,
};
pub use crate::render::backend::{FrameRGBA, SurfaceRenderer};
pub use crate::render::cpu::{CpuRendererOpts, CpuSurfaceRenderer};
pub use crate::scan::{FileRecord, ScanOpts, ScanReport, scan_directory};
pub use crate::timing::duration::{DurationPolicy, DurationResolver, TimingPlan};
pub use crate::timing::window::{FrameWindow, FrameWindowScheduler, WindowPolicy};
