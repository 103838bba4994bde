use super::*;
use crate::matrix::model::Matrix;

fn renderer(w: u32, h: u32) -> CpuSurfaceRenderer {
    let opts = CpuRendererOpts::default().with_canvas(Canvas::new(w, h).unwrap());
    CpuSurfaceRenderer::new(opts).unwrap()
}

fn gradient_set() -> MatrixSet {
    MatrixSet::new(vec![
        Matrix::from_fn(6, 8, |i, j| (i * 8 + j) as f64).unwrap(),
        Matrix::from_fn(5, 5, |i, j| ((i + 1) * (j + 1)) as f64).unwrap(),
    ])
}

fn window(indices: &[usize], alphas: &[f32]) -> FrameWindow {
    FrameWindow {
        indices: indices.to_vec(),
        alphas: alphas.to_vec(),
    }
}

#[test]
fn empty_scene_is_background_only() {
    let mut r = renderer(32, 24);
    let frame = r
        .render_frame(FrameIndex(0), &FrameWindow::default(), &MatrixSet::default())
        .unwrap();
    assert_eq!((frame.width, frame.height), (32, 24));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 32 * 24 * 4);
    assert!(frame.data.chunks_exact(4).all(|px| px == [18, 20, 28, 255]));
}

#[test]
fn visible_surfaces_change_pixels() {
    let mut r = renderer(64, 48);
    let set = gradient_set();
    let frame = r
        .render_frame(FrameIndex(0), &window(&[0, 1], &[0.2, 1.0]), &set)
        .unwrap();
    assert_eq!(frame.data.len(), 64 * 48 * 4);
    assert!(frame.data.chunks_exact(4).any(|px| px != [18, 20, 28, 255]));
}

#[test]
fn rendering_is_repeatable_across_calls() {
    let mut r = renderer(48, 40);
    let set = gradient_set();
    let w = window(&[0, 1], &[0.6, 1.0]);
    let a = r.render_frame(FrameIndex(7), &w, &set).unwrap();
    let _ = r.render_frame(FrameIndex(30), &w, &set).unwrap();
    let b = r.render_frame(FrameIndex(7), &w, &set).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_range_window_index_is_a_render_error() {
    let mut r = renderer(16, 16);
    let err = r
        .render_frame(FrameIndex(0), &window(&[5], &[1.0]), &gradient_set())
        .unwrap_err();
    assert!(matches!(err, DirscapeError::Render(_)));
}

#[test]
fn bezpath_conversion_keeps_elements() {
    let mut p = kurbo::BezPath::new();
    p.move_to((0.0, 0.0));
    p.line_to((4.0, 0.0));
    p.quad_to((5.0, 1.0), (4.0, 4.0));
    p.close_path();
    assert_eq!(bezpath_to_cpu(&p).elements().len(), 4);
}
