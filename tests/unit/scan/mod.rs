use super::*;

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let p = root.join(rel);
    std::fs::create_dir_all(p.parent().unwrap()).unwrap();
    std::fs::write(p, bytes).unwrap();
}

#[test]
fn scan_is_recursive_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.txt", b"1 2");
    write(dir.path(), "a.CSV", b"1,2");
    write(dir.path(), "nested/c.bin", &[0u8; 10]);

    let report = scan_directory(dir.path(), &ScanOpts::default()).unwrap();
    let names: Vec<_> = report
        .records
        .iter()
        .map(|r| r.path.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("a.CSV"),
            PathBuf::from("b.txt"),
            PathBuf::from("nested").join("c.bin"),
        ]
    );
    assert_eq!(report.discovered, 3);
    assert_eq!(report.total_bytes, 3 + 3 + 10);
    assert_eq!(report.records[0].extension.as_deref(), Some("csv"));
    assert_eq!(report.records[2].size_bytes, 10);
    assert!(report.records[0].modified_time > 0.0);
}

#[test]
fn max_files_truncates_in_traversal_order() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        write(dir.path(), &format!("f{i}.dat"), b"1");
    }
    let opts = ScanOpts {
        max_files: Some(2),
        ..ScanOpts::default()
    };
    let report = scan_directory(dir.path(), &opts).unwrap();
    assert_eq!(report.discovered, 5);
    assert_eq!(report.records.len(), 2);
    assert!(report.records[0].path.ends_with("f0.dat"));
    assert!(report.records[1].path.ends_with("f1.dat"));
}

#[test]
fn missing_root_is_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan_directory(&dir.path().join("nope"), &ScanOpts::default()).unwrap_err();
    assert!(matches!(err, DirscapeError::InvalidConfig(_)));
}

#[test]
fn extension_is_optional() {
    assert_eq!(extension_of(Path::new("Makefile")), None);
    assert_eq!(extension_of(Path::new("x.TIFF")).as_deref(), Some("tiff"));
}
