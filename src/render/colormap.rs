use crate::foundation::math::lerp;

// Nine evenly spaced samples of the viridis colormap.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Map `t` in `[0, 1]` to an RGB color. Out-of-range and NaN inputs clamp to the ends.
pub(crate) fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i0 = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i0 as f64;
    let (a, b) = (VIRIDIS[i0], VIRIDIS[i0 + 1]);
    let ch = |k: usize| lerp(f64::from(a[k]), f64::from(b[k]), frac).round() as u8;
    [ch(0), ch(1), ch(2)]
}

#[cfg(test)]
#[path = "../../tests/unit/render/colormap.rs"]
mod tests;
