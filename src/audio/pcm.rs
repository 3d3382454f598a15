use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PagecastError, PagecastResult};

/// Sample rate used by the built-in synthesizer backend.
pub const SYNTH_SAMPLE_RATE: u32 = 48_000;

/// How an audio artifact's bytes are laid out on disk.
///
/// `Wav` files are self-describing; `RawF32le` requires the encoder to be
/// told the sample rate and channel count up front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AudioEncoding {
    Wav,
    RawF32le { sample_rate: u32, channels: u16 },
}

/// Deterministic mono sine tone, interleaved `f32` in [-1, 1].
pub fn sine_pcm(freq_hz: f64, amplitude: f32, duration_secs: f64, sample_rate: u32) -> Vec<f32> {
    let n = ((duration_secs.max(0.0)) * f64::from(sample_rate)).round() as usize;
    let amp = amplitude.clamp(0.0, 1.0);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let t = (i as f64) / f64::from(sample_rate);
        out.push(amp * ((2.0 * std::f64::consts::PI * freq_hz * t).sin() as f32));
    }
    out
}

/// Duration in seconds of an interleaved PCM buffer.
pub fn pcm_duration_secs(sample_len: usize, sample_rate: u32, channels: u16) -> f64 {
    if sample_rate == 0 || channels == 0 {
        return 0.0;
    }
    (sample_len as f64) / f64::from(channels) / f64::from(sample_rate)
}

/// Write interleaved `f32` samples as raw little-endian bytes.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> PagecastResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PagecastError::synthesis(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        PagecastError::synthesis(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Write mono `f32` samples as a 16-bit PCM WAV file.
pub fn write_wav_mono16(samples: &[f32], sample_rate: u32, out_path: &Path) -> PagecastResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PagecastError::synthesis(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(out_path, spec)
        .with_context(|| format!("create wav file '{}'", out_path.display()))?;
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
        writer
            .write_sample(v)
            .with_context(|| format!("write wav sample to '{}'", out_path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalize wav file '{}'", out_path.display()))?;
    Ok(())
}

/// Read the duration of a WAV file from its header.
pub fn probe_wav_duration_secs(path: &Path) -> PagecastResult<f64> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("open wav file '{}'", path.display()))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(PagecastError::synthesis(format!(
            "wav file '{}' reports a zero sample rate",
            path.display()
        )));
    }
    Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
