use super::*;

#[test]
fn reads_format_duration() {
    let json = br#"{"format": {"filename": "a.mp3", "duration": "8.000000", "bit_rate": "128000"}}"#;
    assert_eq!(parse_probe_duration(json).unwrap(), 8.0);
}

#[test]
fn missing_or_bad_duration_is_decode_error() {
    for json in [
        &br#"{"format": {}}"#[..],
        &br#"{"streams": []}"#[..],
        &br#"{"format": {"duration": "N/A"}}"#[..],
        &br#"{"format": {"duration": "0.0"}}"#[..],
        &b"not json"[..],
    ] {
        assert!(matches!(
            parse_probe_duration(json),
            Err(DirscapeError::Decode(_))
        ));
    }
}

#[test]
fn missing_file_is_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe_audio_duration(&dir.path().join("nope.wav")).unwrap_err();
    assert!(matches!(err, DirscapeError::FileAccess(_)));
}
