use super::*;

#[test]
fn endpoints_match_table() {
    assert_eq!(viridis(0.0), [68, 1, 84]);
    assert_eq!(viridis(1.0), [253, 231, 37]);
    assert_eq!(viridis(0.5), [33, 144, 141]);
}

#[test]
fn out_of_range_clamps() {
    assert_eq!(viridis(-3.0), viridis(0.0));
    assert_eq!(viridis(7.0), viridis(1.0));
    assert_eq!(viridis(f64::NAN), viridis(0.0));
}

#[test]
fn green_channel_rises_monotonically() {
    let mut prev = 0u8;
    for i in 0..=100 {
        let g = viridis(f64::from(i) / 100.0)[1];
        assert!(g >= prev);
        prev = g;
    }
}
