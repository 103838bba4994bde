use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_straight_alpha_premultiplies_first() {
    let src = vec![255u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![0, 0, 0, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let err = flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, [0, 0, 0, 255]).unwrap_err();
    assert!(matches!(err, DirscapeError::Encode(_)));
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("out.mp4")));
    let err = sink
        .begin(SinkConfig {
            width: 11,
            height: 8,
            fps: 15,
            bitrate_kbps: 5000,
        })
        .unwrap_err();
    assert!(matches!(err, DirscapeError::InvalidConfig(_)));
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(DirscapeError::Encode(_))
    ));
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}
