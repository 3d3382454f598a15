use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30000, 1001).is_ok());
}

#[test]
fn fps_frame_math() {
    let fps = Fps::whole(30).unwrap();
    assert!((fps.as_f64() - 30.0).abs() < 1e-12);
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert!((fps.frames_to_secs(150) - 5.0).abs() < 1e-9);
}

#[test]
fn video_spec_validation_catches_bad_values() {
    assert!(VideoSpec::new(0, 480, 30, 5.0).is_err());
    assert!(VideoSpec::new(640, 0, 30, 5.0).is_err());
    assert!(VideoSpec::new(641, 480, 30, 5.0).is_err());
    assert!(VideoSpec::new(640, 481, 30, 5.0).is_err());
    assert!(VideoSpec::new(640, 480, 0, 5.0).is_err());
    assert!(VideoSpec::new(640, 480, 30, 0.0).is_err());
    assert!(VideoSpec::new(640, 480, 30, f64::NAN).is_err());
    assert!(VideoSpec::new(640, 480, 30, 5.0).is_ok());
}

#[test]
fn video_spec_rejects_dimensions_beyond_rasterizer() {
    assert!(VideoSpec::new(u32::from(u16::MAX) + 1, 480, 30, 5.0).is_err());
}

#[test]
fn default_shape_yields_150_frames() {
    let spec = VideoSpec::new(640, 480, 30, 5.0).unwrap();
    assert_eq!(spec.frame_count(), 150);
}

#[test]
fn frame_count_rounds_and_never_hits_zero() {
    let spec = VideoSpec::new(640, 480, 30, 0.01).unwrap();
    assert_eq!(spec.frame_count(), 1);

    let spec = VideoSpec::new(640, 480, 30, 1.05).unwrap();
    assert_eq!(spec.frame_count(), 32); // 31.5 rounds up
}
