use super::*;

#[test]
fn default_style_matches_narration_look() {
    let style = FrameStyle::default();
    assert_eq!(style.font, FontSource::Discover);
    assert_eq!(style.size_px, 24.0);
    assert_eq!(style.color_rgba8, [255, 255, 255, 255]);
    assert_eq!(style.background_rgba8, [0, 0, 0, 255]);
    assert_eq!(style.scroll_speed_px, 5.0);
    assert_eq!(style.margin_x_px, 10.0);
    assert_eq!(style.max_width_px, None);
}

#[test]
fn style_validation_catches_bad_values() {
    let mut style = FrameStyle::default();
    style.size_px = 0.0;
    assert!(style.validate().is_err());

    let mut style = FrameStyle::default();
    style.size_px = f32::INFINITY;
    assert!(style.validate().is_err());

    let mut style = FrameStyle::default();
    style.scroll_speed_px = -1.0;
    assert!(style.validate().is_err());

    let mut style = FrameStyle::default();
    style.margin_x_px = f32::NAN;
    assert!(style.validate().is_err());

    assert!(FrameStyle::default().validate().is_ok());
}

#[test]
fn missing_font_file_is_an_error_but_discover_is_not() {
    let style = FrameStyle {
        font: FontSource::File(std::path::PathBuf::from("/nonexistent/font.ttf")),
        ..FrameStyle::default()
    };
    assert!(style.load_font_bytes().is_err());

    // Discover never fails; it reports absence as None.
    let style = FrameStyle::default();
    let _ = style.load_font_bytes().unwrap();
}

#[test]
fn layout_rejects_bad_size_before_touching_fonts() {
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .layout_plain("hello", &[], 0.0, TextBrushRgba8::default(), None)
        .map(|_| ())
        .unwrap_err();
    assert!(err.to_string().contains("size_px"));
}

#[test]
fn layout_rejects_garbage_font_bytes() {
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .layout_plain(
            "hello",
            b"not a font",
            24.0,
            TextBrushRgba8::default(),
            None,
        )
        .map(|_| ())
        .unwrap_err();
    assert!(err.to_string().contains("font"));
}

#[test]
fn style_serde_round_trips() {
    let style = FrameStyle {
        font: FontSource::File(std::path::PathBuf::from("demo.ttf")),
        max_width_px: Some(600.0),
        ..FrameStyle::default()
    };
    let json = serde_json::to_string(&style).unwrap();
    let back: FrameStyle = serde_json::from_str(&json).unwrap();
    assert_eq!(back, style);
}
