use super::*;

use crate::foundation::core::VideoSpec;
use crate::text::extract::NarrationText;

fn tiny_spec() -> VideoSpec {
    VideoSpec::new(64, 48, 10, 1.0).unwrap()
}

#[test]
fn frame_paths_use_zero_padded_names() {
    let set = FrameSet {
        dir: std::path::PathBuf::from("scratch/frames"),
        count: 150,
        width: 640,
        height: 480,
    };
    assert!(
        set.frame_path(FrameIndex(0))
            .ends_with("frames/frame_00000.png")
    );
    assert!(
        set.frame_path(FrameIndex(149))
            .ends_with("frames/frame_00149.png")
    );
    assert!(set.pattern().ends_with("frames/frame_%05d.png"));
}

#[test]
fn generates_one_png_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let text = NarrationText::from_plain("hello scrolling world");
    let set = generate_frames(
        &text,
        &tiny_spec(),
        &FrameStyle::default(),
        dir.path(),
        &FrameThreading::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(set.count, 10);
    set.verify_complete().unwrap();

    let img = image::open(set.frame_path(FrameIndex(0))).unwrap();
    assert_eq!(img.width(), 64);
    assert_eq!(img.height(), 48);
}

#[test]
fn parallel_and_sequential_agree() {
    let text = NarrationText::from_plain("determinism check");
    let spec = tiny_spec();
    let style = FrameStyle::default();

    let seq_dir = tempfile::tempdir().unwrap();
    let seq = generate_frames(
        &text,
        &spec,
        &style,
        seq_dir.path(),
        &FrameThreading::default(),
        &CancelToken::new(),
    )
    .unwrap();

    let par_dir = tempfile::tempdir().unwrap();
    let par = generate_frames(
        &text,
        &spec,
        &style,
        par_dir.path(),
        &FrameThreading {
            parallel: true,
            threads: Some(2),
        },
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(seq.count, par.count);
    for i in 0..seq.count {
        let a = image::open(seq.frame_path(FrameIndex(i))).unwrap().to_rgba8();
        let b = image::open(par.frame_path(FrameIndex(i))).unwrap().to_rgba8();
        assert_eq!(a.as_raw(), b.as_raw(), "frame {i} differs");
    }
}

#[test]
fn cancelled_token_stops_before_any_frame() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = generate_frames(
        &NarrationText::from_plain("never rendered"),
        &tiny_spec(),
        &FrameStyle::default(),
        dir.path(),
        &FrameThreading::default(),
        &cancel,
    )
    .unwrap_err();
    assert!(err.is_cancelled());
    assert!(!dir.path().join("frame_00000.png").exists());
}

#[test]
fn zero_worker_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate_frames(
        &NarrationText::from_plain("hi"),
        &tiny_spec(),
        &FrameStyle::default(),
        dir.path(),
        &FrameThreading {
            parallel: true,
            threads: Some(0),
        },
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("threads"));
}

#[test]
fn verify_complete_flags_missing_frames() {
    let dir = tempfile::tempdir().unwrap();
    let set = FrameSet {
        dir: dir.path().to_path_buf(),
        count: 2,
        width: 64,
        height: 48,
    };
    std::fs::write(set.frame_path(FrameIndex(0)), b"png").unwrap();
    assert!(set.verify_complete().is_err());
}
