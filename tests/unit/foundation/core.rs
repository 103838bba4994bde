use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert!(Canvas::new(640, 480).is_ok());
}

#[test]
fn canvas_even_check() {
    assert!(Canvas::new(640, 480).unwrap().is_even());
    assert!(!Canvas::new(641, 480).unwrap().is_even());
    assert!(Canvas::default().is_even());
}

#[test]
fn frame_index_orders_numerically() {
    assert!(FrameIndex(2) < FrameIndex(10));
}
