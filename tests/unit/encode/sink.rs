use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: 15,
        bitrate_kbps: 5000,
    }
}

fn frame(fill: u8) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: vec![fill; 4 * 2 * 4],
        premultiplied: true,
    }
}

#[test]
fn validate_rejects_zero_fields() {
    assert!(cfg().validate().is_ok());
    for bad in [
        SinkConfig { width: 0, ..cfg() },
        SinkConfig { fps: 0, ..cfg() },
        SinkConfig {
            bitrate_kbps: 0,
            ..cfg()
        },
    ] {
        assert!(matches!(
            bad.validate(),
            Err(DirscapeError::InvalidConfig(_))
        ));
    }
}

#[test]
fn in_memory_sink_collects_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.config(), Some(&cfg()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
    let frames = sink.into_frames();
    assert_eq!(frames[1].data[0], 2);
}

#[test]
fn begin_resets_previous_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.end().unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_ended());
}
