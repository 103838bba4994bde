use super::*;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::render::backend::FrameRGBA;

fn csv_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "1,2,3\n4,5,6\n").unwrap();
    std::fs::write(dir.path().join("b.csv"), "7,8\n9,10\n").unwrap();
    std::fs::write(dir.path().join("c.txt"), "1 1 1\n2 2 2\n3 3 3\n").unwrap();
    dir
}

fn small_cfg(root: &Path, output: PathBuf) -> VisualizeConfig {
    let mut cfg = VisualizeConfig::new(root);
    cfg.output = output;
    cfg.canvas = Canvas::new(64, 48).unwrap();
    cfg.fps = 10;
    cfg.threads = Some(2);
    cfg
}

struct CountingSink {
    path: PathBuf,
    frames: u64,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, cfg: SinkConfig) -> DirscapeResult<()> {
        assert_eq!((cfg.width, cfg.height), (64, 48));
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> DirscapeResult<()> {
        assert_eq!(frame.data.len(), 64 * 48 * 4);
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> DirscapeResult<()> {
        std::fs::write(&self.path, self.frames.to_string())
            .map_err(|e| DirscapeError::encode(e.to_string()))
    }
}

fn counting_sinks(p: &Path) -> DirscapeResult<Box<dyn FrameSink>> {
    Ok(Box::new(CountingSink {
        path: p.to_path_buf(),
        frames: 0,
    }))
}

fn no_mux(_: &Path, _: &Path, _: &Path, _: f64) -> DirscapeResult<()> {
    Err(DirscapeError::encode("muxing disabled in tests"))
}

#[test]
fn defaults_match_cli_defaults() {
    let cfg = VisualizeConfig::new(".");
    assert_eq!(cfg.output, PathBuf::from("file_visualization.mp4"));
    assert_eq!(cfg.max_files, Some(100));
    assert_eq!(cfg.fps, 15);
    assert_eq!(cfg.bitrate_kbps, 5000);
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (1000, 800));
}

#[test]
fn validate_rejects_bad_settings() {
    let dir = csv_tree();
    let ok = small_cfg(dir.path(), "out.mp4".into());
    assert!(ok.validate().is_ok());

    let mut bad = Vec::new();
    bad.push(VisualizeConfig {
        root: dir.path().join("missing"),
        ..ok.clone()
    });
    bad.push(VisualizeConfig { fps: 0, ..ok.clone() });
    bad.push(VisualizeConfig {
        duration: Some(-1.0),
        ..ok.clone()
    });
    bad.push(VisualizeConfig {
        duration: Some(f64::NAN),
        ..ok.clone()
    });
    bad.push(VisualizeConfig {
        max_files: Some(0),
        ..ok.clone()
    });
    bad.push(VisualizeConfig {
        canvas: Canvas::new(63, 48).unwrap(),
        ..ok.clone()
    });
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(DirscapeError::InvalidConfig(_))),
            "accepted {cfg:?}"
        );
    }
}

#[test]
fn odd_canvas_is_fine_for_previews() {
    let dir = csv_tree();
    let cfg = VisualizeConfig {
        canvas: Canvas::new(63, 47).unwrap(),
        preview_frame: Some(0),
        ..small_cfg(dir.path(), "out.png".into())
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn preview_writes_png_of_canvas_size() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("frame.png");
    let cfg = VisualizeConfig {
        preview_frame: Some(50),
        ..small_cfg(dir.path(), out.clone())
    };

    let summary = run_visualization(&cfg).unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.fallbacks, 0);
    assert_eq!(summary.timing.num_frames, 103);
    assert_eq!(summary.preview.as_deref(), Some(out.as_path()));
    assert!(summary.video.is_none());

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
}

#[test]
fn preview_frame_outside_animation_is_rejected() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let cfg = VisualizeConfig {
        preview_frame: Some(103),
        ..small_cfg(dir.path(), out_dir.path().join("f.png"))
    };
    assert!(matches!(
        run_visualization(&cfg),
        Err(DirscapeError::InvalidConfig(_))
    ));
}

#[test]
fn video_run_streams_every_frame_to_the_sink() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("video.mp4");
    let cfg = VisualizeConfig {
        duration: Some(1.2),
        ..small_cfg(dir.path(), out.clone())
    };

    let summary = run_visualization_with(&cfg, &mut counting_sinks, &no_mux).unwrap();
    assert_eq!(summary.timing.num_frames, 12);
    let video = summary.video.as_ref().unwrap();
    assert_eq!(video.frames, 12);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "12");
    assert!(summary.warnings.is_empty());
    assert_eq!(
        summary.summary_line(),
        "processed 3 of 3 files (0 fell back to synthetic representation)"
    );
}

#[test]
fn failed_mux_is_a_warning_not_an_error() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let audio = out_dir.path().join("track.wav");
    std::fs::write(&audio, b"not really audio").unwrap();
    let cfg = VisualizeConfig {
        duration: Some(0.5),
        audio: Some(audio),
        ..small_cfg(dir.path(), out_dir.path().join("video.mp4"))
    };

    let summary = run_visualization_with(&cfg, &mut counting_sinks, &no_mux).unwrap();
    let video = summary.video.unwrap();
    assert!(!video.muxed_audio);
    assert!(video.warning.is_some());
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(std::fs::read_to_string(&video.path).unwrap(), "5");
}

#[test]
fn missing_audio_degrades_to_a_silent_video() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let cfg = VisualizeConfig {
        audio: Some(out_dir.path().join("gone.mp3")),
        ..small_cfg(dir.path(), out_dir.path().join("video.mp4"))
    };
    assert!(cfg.validate().is_ok());

    let summary = run_visualization_with(&cfg, &mut counting_sinks, &FfmpegAudioMuxer).unwrap();
    assert_eq!(summary.timing.num_frames, 103);
    assert_eq!(summary.warnings.len(), 2);
    assert!(summary.warnings[0].starts_with("audio length unknown"));

    let video = summary.video.unwrap();
    assert!(!video.muxed_audio);
    let warning = video.warning.unwrap();
    assert!(warning.audio_path.ends_with("gone.mp3"));
    assert_eq!(std::fs::read_to_string(&video.path).unwrap(), "103");
    let names: Vec<_> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["video.mp4"]);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_cfg(dir.path(), "unused.mp4".into());
    assert!(matches!(
        run_visualization_with(&cfg, &mut counting_sinks, &no_mux),
        Err(DirscapeError::InvalidConfig(_))
    ));
}

#[test]
fn max_files_caps_the_scan() {
    let dir = csv_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let cfg = VisualizeConfig {
        max_files: Some(2),
        duration: Some(0.3),
        ..small_cfg(dir.path(), out_dir.path().join("v.mp4"))
    };
    let summary = run_visualization_with(&cfg, &mut counting_sinks, &no_mux).unwrap();
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.considered, 2);
    assert_eq!(summary.processed, 2);
}
