use anyhow::Context as _;

use crate::foundation::error::{DirscapeError, DirscapeResult};
use crate::matrix::model::Matrix;

/// Decode image bytes into a luma intensity matrix.
///
/// The format is taken from `extension`, so bytes that do not match their extension fail even if
/// they are a valid image of another kind. Images larger than `cap` on either side are
/// area-averaged down so the longer side equals `cap`, keeping the aspect ratio.
pub(crate) fn decode_image_luma(bytes: &[u8], extension: &str, cap: u32) -> DirscapeResult<Matrix> {
    let format = image::ImageFormat::from_extension(extension).ok_or_else(|| {
        DirscapeError::decode(format!("no image format for extension '{extension}'"))
    })?;
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .context("decode image from memory")
        .map_err(|e| DirscapeError::decode(format!("{e:#}")))?;

    let mut luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    if let Some((nw, nh)) = fit_within(w, h, cap) {
        luma = image::imageops::thumbnail(&luma, nw, nh);
    }

    let (w, h) = luma.dimensions();
    let data = luma.into_raw().into_iter().map(f64::from).collect();
    Matrix::new(h as usize, w as usize, data)
}

/// Target size when `(w, h)` exceeds `cap`, `None` when it already fits.
pub(crate) fn fit_within(w: u32, h: u32, cap: u32) -> Option<(u32, u32)> {
    let cap = cap.max(1);
    if w <= cap && h <= cap {
        return None;
    }
    let scale = f64::from(cap) / f64::from(w.max(h));
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, cap);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, cap);
    Some((nw, nh))
}

/// Parse delimited numeric text into a matrix.
///
/// Blank lines and `#` comments are ignored. Rows with any non-numeric or non-finite token (for
/// example a header) are skipped. All remaining rows must share one column count. The result is
/// clipped to `max_rows` x `max_cols` and shifted up so its minimum is zero when it holds negative
/// values.
pub(crate) fn parse_numeric_text(
    bytes: &[u8],
    max_rows: usize,
    max_cols: usize,
) -> DirscapeResult<Matrix> {
    let text = String::from_utf8_lossy(bytes);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_row(line) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    let Some(first) = rows.first() else {
        return Err(DirscapeError::parse(format!(
            "no fully numeric rows found ({skipped} rows skipped)"
        )));
    };
    let cols = first.len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(DirscapeError::parse(format!(
            "inconsistent column count: row {idx} has {} columns, expected {cols}",
            row.len()
        )));
    }

    let keep_rows = rows.len().min(max_rows.max(1));
    let keep_cols = cols.min(max_cols.max(1));
    let mut data = Vec::with_capacity(keep_rows * keep_cols);
    for row in rows.iter().take(keep_rows) {
        data.extend_from_slice(&row[..keep_cols]);
    }

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        for v in &mut data {
            *v -= min;
        }
    }

    Matrix::new(keep_rows, keep_cols, data)
}

fn parse_row(line: &str) -> Option<Vec<f64>> {
    let mut out = Vec::new();
    for tok in line
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let v = tok.parse::<f64>().ok().filter(|v| v.is_finite())?;
        out.push(v);
    }
    if out.is_empty() { None } else { Some(out) }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/decode.rs"]
mod tests;
