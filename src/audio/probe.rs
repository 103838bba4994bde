use std::path::Path;

use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Measure the playback length of an audio file in seconds using `ffprobe`.
#[tracing::instrument]
pub fn probe_audio_duration(path: &Path) -> DirscapeResult<f64> {
    if !path.is_file() {
        return Err(DirscapeError::file_access(path, "audio file not found"));
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| DirscapeError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(DirscapeError::decode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let secs = parse_probe_duration(&out.stdout)?;
    tracing::debug!(secs, "probed audio duration");
    Ok(secs)
}

/// Extract `format.duration` from `ffprobe -print_format json` output.
pub(crate) fn parse_probe_duration(json: &[u8]) -> DirscapeResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| DirscapeError::decode(format!("ffprobe json parse failed: {e}")))?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| DirscapeError::decode("ffprobe reported no duration"))?;
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DirscapeError::decode(format!("invalid ffprobe duration '{raw}'")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(DirscapeError::decode(format!(
            "audio duration must be > 0, got {secs}"
        )));
    }
    Ok(secs)
}

/// `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    crate::encode::ffmpeg::tool_on_path("ffprobe")
}

#[cfg(test)]
#[path = "../../tests/unit/audio/probe.rs"]
mod tests;
