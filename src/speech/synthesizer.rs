use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::audio::pcm::{self, AudioEncoding, SYNTH_SAMPLE_RATE};
use crate::foundation::error::{PagecastError, PagecastResult};
use crate::pipeline::cancel::CancelToken;
use crate::text::extract::NarrationText;

/// Voice locale: BCP-47-ish `(language, region)` pair plus an optional
/// engine-reported display name. Absent locale means the engine's system
/// default voice.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Locale {
    pub language: String,
    pub region: String,
    pub display_name: Option<String>,
}

/// Voice parameters passed through to the synthesis engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeechOptions {
    pub locale: Option<Locale>,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            locale: None,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechOptions {
    pub fn validate(&self) -> PagecastResult<()> {
        if !self.pitch.is_finite() || !(0.5..=2.0).contains(&self.pitch) {
            return Err(PagecastError::input(format!(
                "speech pitch must be in [0.5, 2.0], got {}",
                self.pitch
            )));
        }
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(PagecastError::input(format!(
                "speech volume must be in [0.0, 1.0], got {}",
                self.volume
            )));
        }
        if let Some(locale) = &self.locale
            && locale.language.is_empty()
        {
            return Err(PagecastError::input(
                "speech locale language must be non-empty when a locale is set",
            ));
        }
        Ok(())
    }
}

/// Durable audio file produced by a synthesis backend.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub encoding: AudioEncoding,
    /// Playback length, when the backend knows it. Filled from the WAV
    /// header by [`resolve_duration`](Self::resolve_duration) otherwise.
    pub duration_secs: Option<f64>,
}

impl AudioArtifact {
    /// Check the artifact exists on disk and is non-empty.
    ///
    /// The encode stage must not start until this holds.
    pub fn verify_durable(&self) -> PagecastResult<()> {
        let meta = std::fs::metadata(&self.path).map_err(|e| {
            PagecastError::synthesis(format!(
                "audio artifact '{}' is missing: {e}",
                self.path.display()
            ))
        })?;
        if meta.len() == 0 {
            return Err(PagecastError::synthesis(format!(
                "audio artifact '{}' is empty",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Playback length, probing the WAV header when the backend did not
    /// report one. Raw PCM artifacts derive it from the file size.
    pub fn resolve_duration(&self) -> PagecastResult<f64> {
        if let Some(d) = self.duration_secs {
            return Ok(d);
        }
        match self.encoding {
            AudioEncoding::Wav => pcm::probe_wav_duration_secs(&self.path),
            AudioEncoding::RawF32le {
                sample_rate,
                channels,
            } => {
                let meta = std::fs::metadata(&self.path).map_err(|e| {
                    PagecastError::synthesis(format!(
                        "audio artifact '{}' is missing: {e}",
                        self.path.display()
                    ))
                })?;
                Ok(pcm::pcm_duration_secs(
                    (meta.len() / 4) as usize,
                    sample_rate,
                    channels,
                ))
            }
        }
    }
}

/// Capability boundary to an external speech-synthesis engine.
///
/// Backends are interchangeable implementations selected when the pipeline is
/// constructed. The contract the pipeline relies on:
///
/// - one attempt per job, no internal retries;
/// - cancellation (via `cancel`) releases engine resources and surfaces
///   `PagecastError::Cancelled` — a partially written file may remain at
///   `out_path` and is reclaimed with the job scratch directory;
/// - initialization failures (engine or voice unavailable) and mid-synthesis
///   failures both surface as `PagecastError::Synthesis`, with a message
///   saying which.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// File extension for the artifact this backend writes (no dot).
    fn audio_extension(&self) -> &'static str {
        "wav"
    }

    /// Synthesize `text` to a durable audio file at `out_path`.
    async fn synthesize(
        &self,
        text: &NarrationText,
        options: &SpeechOptions,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> PagecastResult<AudioArtifact>;
}

/// Deterministic built-in backend that renders a fixed-frequency tone.
///
/// Stands in for a real engine in tests and demos: the tone's length tracks
/// the narration word count at `words_per_sec`, pitch scales the frequency,
/// and volume scales the amplitude. Output is 16-bit mono WAV.
#[derive(Clone, Debug)]
pub struct ToneSynthesizer {
    pub base_freq_hz: f64,
    pub words_per_sec: f64,
    pub sample_rate: u32,
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self {
            base_freq_hz: 220.0,
            words_per_sec: 2.5,
            sample_rate: SYNTH_SAMPLE_RATE,
        }
    }
}

impl ToneSynthesizer {
    /// Tone length for a narration: word count over speaking rate, clamped to
    /// at least half a second so short inputs still produce audible output.
    pub fn duration_for(&self, text: &NarrationText) -> f64 {
        ((text.word_count() as f64) / self.words_per_sec).max(0.5)
    }
}

#[async_trait]
impl SpeechSynthesizer for ToneSynthesizer {
    async fn synthesize(
        &self,
        text: &NarrationText,
        options: &SpeechOptions,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> PagecastResult<AudioArtifact> {
        if self.sample_rate == 0 {
            return Err(PagecastError::synthesis(
                "tone synthesizer initialization failed: sample_rate must be non-zero",
            ));
        }
        cancel.checkpoint("speech synthesis")?;

        let duration_secs = self.duration_for(text);
        let freq = self.base_freq_hz * f64::from(options.pitch);
        let samples = pcm::sine_pcm(freq, options.volume, duration_secs, self.sample_rate);
        cancel.checkpoint("speech synthesis")?;

        tracing::debug!(
            words = text.word_count(),
            duration_secs,
            freq_hz = freq,
            "tone synthesizer rendering narration"
        );
        pcm::write_wav_mono16(&samples, self.sample_rate, out_path)?;

        Ok(AudioArtifact {
            path: out_path.to_path_buf(),
            encoding: AudioEncoding::Wav,
            duration_secs: Some(duration_secs),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/speech/synthesizer.rs"]
mod tests;
