use super::*;

#[test]
fn new_validates_shape_and_values() {
    assert!(Matrix::new(0, 1, vec![]).is_err());
    assert!(Matrix::new(1, 0, vec![]).is_err());
    assert!(Matrix::new(2, 2, vec![1.0; 3]).is_err());
    assert!(Matrix::new(1, 2, vec![1.0, -0.5]).is_err());
    assert!(Matrix::new(1, 2, vec![1.0, f64::NAN]).is_err());
    assert!(Matrix::new(1, 2, vec![1.0, f64::INFINITY]).is_err());

    let m = Matrix::new(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    assert_eq!(m.rows(), 2);
    assert_eq!(m.cols(), 3);
    assert_eq!(m.get(1, 2), Some(5.0));
    assert_eq!(m.get(2, 0), None);
    assert_eq!(m.get(0, 3), None);
    assert_eq!(m.max_value(), 5.0);
}

#[test]
fn from_fn_is_row_major() {
    let m = Matrix::from_fn(2, 2, |i, j| (i * 10 + j) as f64).unwrap();
    assert_eq!(m.values(), &[0.0, 1.0, 10.0, 11.0]);
}

#[test]
fn bounds_cover_every_matrix() {
    assert!(MatrixSet::default().bounds().is_none());

    let set = MatrixSet::new(vec![
        Matrix::from_fn(3, 1, |_, _| 2.0).unwrap(),
        Matrix::from_fn(1, 7, |_, j| j as f64).unwrap(),
    ]);
    let b = set.bounds().unwrap();
    assert_eq!(b.max_rows, 3);
    assert_eq!(b.max_cols, 7);
    assert_eq!(b.max_value, 6.0);
    assert_eq!(set.len(), 2);
}
