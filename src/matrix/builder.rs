use std::io::Read as _;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::matrix::decode::{decode_image_luma, parse_numeric_text};
use crate::matrix::model::{Matrix, MatrixSet};
use crate::scan::FileRecord;

/// Conversion strategy selected from a file's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FileClass {
    /// Raster image, decoded to luma intensity.
    Image,
    /// Delimited numeric text.
    NumericText,
    /// Anything else; represented by the synthetic matrix.
    Opaque,
}

impl FileClass {
    /// Classify a lowercased extension (without the dot).
    pub fn of(extension: Option<&str>) -> Self {
        match extension {
            Some("jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff" | "gif" | "webp") => Self::Image,
            Some("txt" | "csv" | "tsv" | "dat") => Self::NumericText,
            _ => Self::Opaque,
        }
    }
}

/// How a matrix was produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum MatrixSource {
    /// Decoded from image pixels.
    Image,
    /// Parsed from numeric text.
    NumericText,
    /// Derived from size and modification time. `fallback` holds the reason when a richer
    /// conversion was attempted and failed.
    Synthetic {
        /// Why the richer conversion was abandoned, `None` for opaque files.
        fallback: Option<String>,
    },
}

impl MatrixSource {
    /// `true` when this matrix replaced a failed image/text conversion.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Synthetic { fallback: Some(_) })
    }
}

/// Matrix plus its provenance.
#[derive(Clone, Debug)]
pub struct BuiltMatrix {
    /// Converted matrix.
    pub matrix: Matrix,
    /// Conversion that produced it.
    pub source: MatrixSource,
}

/// Conversion limits.
#[derive(Clone, Debug)]
pub struct MatrixBuildOpts {
    /// Images larger than this on either side are downsampled.
    pub image_cap: u32,
    /// Row budget for numeric text.
    pub text_max_rows: usize,
    /// Column budget for numeric text.
    pub text_max_cols: usize,
    /// Image/text files larger than this are not read and use the synthetic matrix.
    pub max_read_bytes: u64,
}

impl Default for MatrixBuildOpts {
    fn default() -> Self {
        Self {
            image_cap: 100,
            text_max_rows: 100,
            text_max_cols: 100,
            max_read_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Threading for [`MatrixBuilder::build_all`].
#[derive(Clone, Debug, Default)]
pub struct BuildThreading {
    /// Convert files on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Per-file result of a batch build, aligned with the input records.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FileOutcome {
    /// File that was converted.
    pub path: PathBuf,
    /// Extension class used for dispatch.
    pub class: FileClass,
    /// What happened to it.
    pub status: OutcomeStatus,
}

/// Status of one file in a batch.
#[derive(Clone, Debug, serde::Serialize)]
pub enum OutcomeStatus {
    /// Converted; the matrix is part of the set.
    Built(MatrixSource),
    /// Could not be read; left out of the set.
    Skipped(String),
}

/// Output of a batch build.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    /// Matrices of every built file, in input order.
    pub matrices: MatrixSet,
    /// One entry per input record, in input order.
    pub outcomes: Vec<FileOutcome>,
}

impl BuildReport {
    /// Number of files that produced a matrix.
    pub fn processed(&self) -> usize {
        self.matrices.len()
    }

    /// Number of files that fell back to the synthetic matrix after a failed conversion.
    pub fn fallbacks(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.status, OutcomeStatus::Built(s) if s.is_fallback()))
            .count()
    }

    /// Number of files left out because they could not be read.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped(_)))
            .count()
    }
}

/// Converts files into matrices.
///
/// Dispatch is closed over [`FileClass`]; every image/text failure lands in the synthetic arm, so
/// [`MatrixBuilder::build`] cannot fail.
#[derive(Clone, Debug, Default)]
pub struct MatrixBuilder {
    opts: MatrixBuildOpts,
}

impl MatrixBuilder {
    /// Create a builder with the given limits.
    pub fn new(opts: MatrixBuildOpts) -> Self {
        Self { opts }
    }

    /// Builder limits.
    pub fn opts(&self) -> &MatrixBuildOpts {
        &self.opts
    }

    /// Convert already-read file bytes.
    pub fn build(&self, record: &FileRecord, bytes: &[u8]) -> BuiltMatrix {
        let converted = match FileClass::of(record.extension.as_deref()) {
            FileClass::Opaque => return self.synthetic(record, None),
            _ if bytes.is_empty() => {
                return self.synthetic(record, Some("empty file".to_string()));
            }
            FileClass::Image => decode_image_luma(
                bytes,
                record.extension.as_deref().unwrap_or_default(),
                self.opts.image_cap,
            )
            .map(|m| (m, MatrixSource::Image)),
            FileClass::NumericText => {
                parse_numeric_text(bytes, self.opts.text_max_rows, self.opts.text_max_cols)
                    .map(|m| (m, MatrixSource::NumericText))
            }
        };

        match converted {
            Ok((matrix, source)) => BuiltMatrix { matrix, source },
            Err(e) => {
                tracing::warn!(
                    path = %record.path.display(),
                    error = %e,
                    "conversion failed, using synthetic matrix"
                );
                self.synthetic(record, Some(e.to_string()))
            }
        }
    }

    /// Open `record.path` and convert it.
    ///
    /// Only [`DirscapeError::FileAccess`] escapes; the file handle is closed before returning.
    pub fn build_from_disk(&self, record: &FileRecord) -> DirscapeResult<BuiltMatrix> {
        let mut file = std::fs::File::open(&record.path)
            .map_err(|e| DirscapeError::file_access(&record.path, e))?;

        let class = FileClass::of(record.extension.as_deref());
        if class == FileClass::Opaque {
            return Ok(self.synthetic(record, None));
        }
        if record.size_bytes > self.opts.max_read_bytes {
            return Ok(self.synthetic(
                record,
                Some(format!(
                    "file exceeds read limit of {} bytes",
                    self.opts.max_read_bytes
                )),
            ));
        }

        let mut bytes = Vec::with_capacity(record.size_bytes as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| DirscapeError::file_access(&record.path, e))?;
        Ok(self.build(record, &bytes))
    }

    /// Convert every record, keeping input order in the resulting set.
    ///
    /// Unreadable files are skipped and reported; they never fail the batch.
    #[tracing::instrument(skip(self, records), fields(files = records.len()))]
    pub fn build_all(
        &self,
        records: &[FileRecord],
        threading: &BuildThreading,
    ) -> DirscapeResult<BuildReport> {
        let results: Vec<DirscapeResult<BuiltMatrix>> = if threading.parallel {
            let pool = build_thread_pool(threading.threads)?;
            pool.install(|| {
                records
                    .par_iter()
                    .map(|r| self.build_from_disk(r))
                    .collect()
            })
        } else {
            records.iter().map(|r| self.build_from_disk(r)).collect()
        };

        let mut matrices = Vec::with_capacity(records.len());
        let mut outcomes = Vec::with_capacity(records.len());
        for (record, result) in records.iter().zip(results) {
            let class = FileClass::of(record.extension.as_deref());
            let status = match result {
                Ok(built) => {
                    matrices.push(built.matrix);
                    OutcomeStatus::Built(built.source)
                }
                Err(e) => {
                    tracing::warn!(path = %record.path.display(), error = %e, "skipping file");
                    OutcomeStatus::Skipped(e.to_string())
                }
            };
            outcomes.push(FileOutcome {
                path: record.path.clone(),
                class,
                status,
            });
        }

        let report = BuildReport {
            matrices: MatrixSet::new(matrices),
            outcomes,
        };
        tracing::info!(
            processed = report.processed(),
            fallbacks = report.fallbacks(),
            skipped = report.skipped(),
            "matrix build complete"
        );
        Ok(report)
    }

    fn synthetic(&self, record: &FileRecord, fallback: Option<String>) -> BuiltMatrix {
        BuiltMatrix {
            matrix: synthetic_matrix(record.size_bytes, record.modified_time),
            source: MatrixSource::Synthetic { fallback },
        }
    }
}

/// Deterministic matrix derived from file metadata alone.
///
/// `rows = clamp(floor(size / 1000), 5, 50)`, `cols = clamp(floor(mtime mod 100), 5, 50)` and
/// `value(i, j) = (i * j + size + mtime) mod 255`, with Euclidean modulo on `f64`. A non-finite
/// `modified_time` is treated as `0.0`.
pub fn synthetic_matrix(size_bytes: u64, modified_time: f64) -> Matrix {
    let mtime = if modified_time.is_finite() {
        modified_time
    } else {
        0.0
    };
    let size = size_bytes as f64;

    let rows = (size_bytes / 1000).clamp(5, 50) as usize;
    let cols = (mtime.rem_euclid(100.0).floor() as usize).clamp(5, 50);

    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            data.push(((i * j) as f64 + size + mtime).rem_euclid(255.0));
        }
    }
    Matrix::from_trusted(rows, cols, data)
}

fn build_thread_pool(threads: Option<usize>) -> DirscapeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DirscapeError::invalid_config(
            "build threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        DirscapeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/builder.rs"]
mod tests;
