use super::*;

fn narration(words: &str) -> NarrationText {
    NarrationText::from_plain(words)
}

#[test]
fn options_validation_bounds_pitch_and_volume() {
    assert!(SpeechOptions::default().validate().is_ok());

    let mut opts = SpeechOptions::default();
    opts.pitch = 0.4;
    assert!(opts.validate().is_err());
    opts.pitch = 2.1;
    assert!(opts.validate().is_err());
    opts.pitch = f32::NAN;
    assert!(opts.validate().is_err());

    let mut opts = SpeechOptions::default();
    opts.volume = -0.1;
    assert!(opts.validate().is_err());
    opts.volume = 1.1;
    assert!(opts.validate().is_err());
}

#[test]
fn options_validation_rejects_empty_locale_language() {
    let opts = SpeechOptions {
        locale: Some(Locale {
            language: String::new(),
            region: "US".to_string(),
            display_name: None,
        }),
        ..SpeechOptions::default()
    };
    assert!(opts.validate().is_err());
}

#[test]
fn tone_duration_tracks_word_count() {
    let synth = ToneSynthesizer::default();
    assert!((synth.duration_for(&narration("one two three four five")) - 2.0).abs() < 1e-9);
    // Short inputs are clamped so the tone stays audible.
    assert!((synth.duration_for(&narration("hi")) - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn tone_writes_durable_wav_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narration.wav");
    let synth = ToneSynthesizer::default();
    let cancel = CancelToken::new();

    let artifact = synth
        .synthesize(
            &narration("hello world from the tone backend"),
            &SpeechOptions::default(),
            &path,
            &cancel,
        )
        .await
        .unwrap();

    artifact.verify_durable().unwrap();
    assert_eq!(artifact.encoding, AudioEncoding::Wav);
    let duration = artifact.resolve_duration().unwrap();
    assert!((duration - 2.4).abs() < 1e-2); // 6 words / 2.5 wps
}

#[tokio::test]
async fn cancelled_token_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narration.wav");
    let synth = ToneSynthesizer::default();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = synth
        .synthesize(
            &narration("hello"),
            &SpeechOptions::default(),
            &path,
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(!path.exists());
}

#[tokio::test]
async fn zero_sample_rate_is_an_initialization_failure() {
    let dir = tempfile::tempdir().unwrap();
    let synth = ToneSynthesizer {
        sample_rate: 0,
        ..ToneSynthesizer::default()
    };
    let err = synth
        .synthesize(
            &narration("hello"),
            &SpeechOptions::default(),
            &dir.path().join("narration.wav"),
            &CancelToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PagecastError::Synthesis(_)));
    assert!(err.to_string().contains("initialization failed"));
}

#[test]
fn artifact_duration_falls_back_to_raw_pcm_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narration.f32le");
    let samples = pcm::sine_pcm(220.0, 1.0, 2.0, 8_000);
    pcm::write_f32le_file(&samples, &path).unwrap();

    let artifact = AudioArtifact {
        path,
        encoding: AudioEncoding::RawF32le {
            sample_rate: 8_000,
            channels: 1,
        },
        duration_secs: None,
    };
    assert!((artifact.resolve_duration().unwrap() - 2.0).abs() < 1e-6);
}

#[test]
fn verify_durable_rejects_missing_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = AudioArtifact {
        path: dir.path().join("nope.wav"),
        encoding: AudioEncoding::Wav,
        duration_secs: None,
    };
    assert!(missing.verify_durable().is_err());

    let empty_path = dir.path().join("empty.wav");
    std::fs::write(&empty_path, b"").unwrap();
    let empty = AudioArtifact {
        path: empty_path,
        encoding: AudioEncoding::Wav,
        duration_secs: None,
    };
    assert!(empty.verify_durable().is_err());
}
