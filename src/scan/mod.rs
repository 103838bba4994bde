//! Directory traversal.
//!
//! The scanner turns a directory tree into an ordered list of [`FileRecord`]s. Order is the
//! traversal order (file names sorted within each directory) and drives the direction of the
//! animation, so it must be stable across runs.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use crate::foundation::error::{DirscapeError, DirscapeResult};

/// Metadata for one discovered file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FileRecord {
    /// Path of the file as discovered (root-joined).
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Modification time in seconds since the UNIX epoch (`0.0` when unavailable).
    pub modified_time: f64,
    /// Lowercased extension without the leading dot.
    pub extension: Option<String>,
}

impl FileRecord {
    /// Build a record from a path and its metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, meta: &std::fs::Metadata) -> Self {
        let path = path.into();
        let modified_time = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            extension: extension_of(&path),
            path,
            size_bytes: meta.len(),
            modified_time,
        }
    }

    /// Stat `path` and build its record.
    pub fn from_path(path: impl Into<PathBuf>) -> DirscapeResult<Self> {
        let path = path.into();
        let meta = std::fs::metadata(&path).map_err(|e| DirscapeError::file_access(&path, e))?;
        Ok(Self::from_metadata(path, &meta))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
}

/// Scanner options.
#[derive(Clone, Debug)]
pub struct ScanOpts {
    /// Keep at most this many records (first in traversal order). `None` keeps everything.
    pub max_files: Option<usize>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            max_files: Some(100),
            follow_links: false,
        }
    }
}

/// Result of a directory scan.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    /// Records kept after applying `max_files`.
    pub records: Vec<FileRecord>,
    /// Number of regular files discovered before the cap.
    pub discovered: usize,
    /// Total size of all discovered files.
    pub total_bytes: u64,
    /// Entries that could not be walked or stat-ed.
    pub unreadable: Vec<PathBuf>,
}

/// Recursively scan `root` for regular files.
///
/// Unreadable entries are logged and recorded in [`ScanReport::unreadable`]; only a missing or
/// non-directory root is an error.
#[tracing::instrument(skip(opts), fields(root = %root.display()))]
pub fn scan_directory(root: &Path, opts: &ScanOpts) -> DirscapeResult<ScanReport> {
    if !root.is_dir() {
        return Err(DirscapeError::invalid_config(format!(
            "root '{}' is not a directory",
            root.display()
        )));
    }

    let mut report = ScanReport::default();
    let walker = WalkDir::new(root)
        .follow_links(opts.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                report.unreadable.push(path);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping file without metadata");
                report.unreadable.push(entry.path().to_path_buf());
                continue;
            }
        };
        report.total_bytes = report.total_bytes.saturating_add(meta.len());
        report.discovered += 1;
        report
            .records
            .push(FileRecord::from_metadata(entry.path(), &meta));
    }

    tracing::info!(
        files = report.discovered,
        total_mib = report.total_bytes as f64 / (1024.0 * 1024.0),
        "scan complete"
    );

    if let Some(max) = opts.max_files
        && report.records.len() > max
    {
        tracing::info!("limiting to {max} files out of {}", report.records.len());
        report.records.truncate(max);
    }

    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/scan/mod.rs"]
mod tests;
