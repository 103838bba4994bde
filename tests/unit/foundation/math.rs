use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn premul_keeps_opaque_and_zeroes_transparent() {
    assert_eq!(premul_rgba8([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(premul_rgba8([10, 20, 30, 0]), [0, 0, 0, 0]);
    assert_eq!(premul_rgba8([255, 0, 0, 128]), [128, 0, 0, 128]);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
}
