use kurbo::{BezPath, Point};

use crate::foundation::core::{Canvas, FrameIndex};
use crate::matrix::model::{Matrix, SceneBounds};

/// Orbiting camera for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Camera {
    pub(crate) azimuth_deg: f64,
    pub(crate) elevation_deg: f64,
}

impl Camera {
    /// Camera for `frame`: azimuth `(degrees_per_frame * frame) mod 360`.
    pub(crate) fn for_frame(frame: FrameIndex, degrees_per_frame: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg: (degrees_per_frame * frame.0 as f64).rem_euclid(360.0),
            elevation_deg,
        }
    }
}

/// Orthographic projection of the scene box onto the canvas.
///
/// Scene space is normalized so x (columns) and y (rows) span `[-0.5, 0.5]` and z (values) spans
/// `[-z_scale / 2, z_scale / 2]`, using the same bounds for every frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projector {
    bounds: SceneBounds,
    z_scale: f64,
    sin_az: f64,
    cos_az: f64,
    sin_el: f64,
    cos_el: f64,
    center: Point,
    scale: f64,
}

/// Screen position plus depth; larger depth is farther from the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projected {
    pub(crate) point: Point,
    pub(crate) depth: f64,
}

impl Projector {
    pub(crate) fn new(canvas: Canvas, bounds: SceneBounds, camera: Camera, z_scale: f64) -> Self {
        let (sin_az, cos_az) = camera.azimuth_deg.to_radians().sin_cos();
        let (sin_el, cos_el) = camera.elevation_deg.to_radians().sin_cos();
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        // Half-diagonal of the unit floor plus half the height is the farthest a corner can reach.
        let reach = (0.5f64.hypot(0.5) + z_scale * 0.5).max(1e-6);
        Self {
            bounds,
            z_scale,
            sin_az,
            cos_az,
            sin_el,
            cos_el,
            center: Point::new(w * 0.5, h * 0.5),
            scale: 0.45 * w.min(h) / reach,
        }
    }

    /// Project a scene-space point (column, row, value).
    pub(crate) fn project(&self, col: f64, row: f64, value: f64) -> Projected {
        let x = normalize_axis(col, self.bounds.max_cols);
        let y = normalize_axis(row, self.bounds.max_rows);
        let z = if self.bounds.max_value > 0.0 {
            (value / self.bounds.max_value - 0.5) * self.z_scale
        } else {
            -0.5 * self.z_scale
        };

        let xr = x * self.cos_az - y * self.sin_az;
        let yr = x * self.sin_az + y * self.cos_az;

        let depth = yr * self.cos_el - z * self.sin_el;
        let up = yr * self.sin_el + z * self.cos_el;

        Projected {
            point: Point::new(
                self.center.x + xr * self.scale,
                self.center.y - up * self.scale,
            ),
            depth,
        }
    }
}

fn normalize_axis(v: f64, count: usize) -> f64 {
    let span = count.saturating_sub(1).max(1) as f64;
    v / span - 0.5
}

/// One filled cell of a surface.
#[derive(Clone, Debug)]
pub(crate) struct Quad {
    pub(crate) path: BezPath,
    pub(crate) depth: f64,
    /// Mean height of the cell normalized to `[0, 1]`.
    pub(crate) level: f64,
    pub(crate) alpha: f32,
}

/// Grid coordinates sampled along one matrix axis, at most `max_samples` long, always
/// including the last index. Single-element axes are widened to a one-unit strip.
fn axis_samples(len: usize, max_samples: usize) -> Vec<(f64, usize)> {
    if len <= 1 {
        return vec![(0.0, 0), (1.0, 0)];
    }
    let max_samples = max_samples.max(2);
    let stride = len.div_ceil(max_samples - 1).max(1);
    let mut out: Vec<(f64, usize)> = (0..len).step_by(stride).map(|i| (i as f64, i)).collect();
    if out.last().map(|(_, i)| *i) != Some(len - 1) {
        out.push(((len - 1) as f64, len - 1));
    }
    out
}

/// Tessellate `matrix` into projected quads at opacity `alpha`.
pub(crate) fn surface_quads(
    projector: &Projector,
    matrix: &Matrix,
    alpha: f32,
    max_samples: usize,
) -> Vec<Quad> {
    let rows = axis_samples(matrix.rows(), max_samples);
    let cols = axis_samples(matrix.cols(), max_samples);
    let max_value = projector.bounds.max_value;
    let value_at = |r: usize, c: usize| matrix.get(r, c).unwrap_or(0.0);

    let mut grid = Vec::with_capacity(rows.len() * cols.len());
    for &(ry, ri) in &rows {
        for &(cx, ci) in &cols {
            grid.push(projector.project(cx, ry, value_at(ri, ci)));
        }
    }

    let mut quads = Vec::with_capacity((rows.len() - 1) * (cols.len() - 1));
    let w = cols.len();
    for r in 0..rows.len() - 1 {
        for c in 0..w - 1 {
            let corners = [
                grid[r * w + c],
                grid[r * w + c + 1],
                grid[(r + 1) * w + c + 1],
                grid[(r + 1) * w + c],
            ];
            let mean_value = [
                value_at(rows[r].1, cols[c].1),
                value_at(rows[r].1, cols[c + 1].1),
                value_at(rows[r + 1].1, cols[c + 1].1),
                value_at(rows[r + 1].1, cols[c].1),
            ]
            .iter()
            .sum::<f64>()
                / 4.0;

            let mut path = BezPath::new();
            path.move_to(corners[0].point);
            for p in &corners[1..] {
                path.line_to(p.point);
            }
            path.close_path();

            quads.push(Quad {
                path,
                depth: corners.iter().map(|p| p.depth).sum::<f64>() / 4.0,
                level: if max_value > 0.0 {
                    mean_value / max_value
                } else {
                    0.0
                },
                alpha,
            });
        }
    }
    quads
}

/// Outline of the floor plane (value 0) as a closed path.
pub(crate) fn floor_path(projector: &Projector) -> BezPath {
    let b = projector.bounds;
    let max_c = b.max_cols.saturating_sub(1).max(1) as f64;
    let max_r = b.max_rows.saturating_sub(1).max(1) as f64;
    let mut path = BezPath::new();
    path.move_to(projector.project(0.0, 0.0, 0.0).point);
    path.line_to(projector.project(max_c, 0.0, 0.0).point);
    path.line_to(projector.project(max_c, max_r, 0.0).point);
    path.line_to(projector.project(0.0, max_r, 0.0).point);
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/projection.rs"]
mod tests;
