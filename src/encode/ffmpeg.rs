use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::Context as _;

use crate::audio::pcm::AudioEncoding;
use crate::foundation::error::{PagecastError, PagecastResult};
use crate::pipeline::cancel::CancelToken;

/// Narration audio handed to the muxer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioInput {
    pub path: PathBuf,
    pub encoding: AudioEncoding,
}

/// Configuration for muxing a PNG frame sequence and narration audio into MP4.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// image2 input pattern, e.g. `frames/frame_%05d.png`.
    pub frame_pattern: PathBuf,
    pub fps: u32,
    pub audio: Option<AudioInput>,
    /// Target video duration in seconds. The video track always runs this
    /// long; shorter audio simply ends early.
    pub duration_secs: f64,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

/// A finished MP4 on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoOutput {
    pub path: PathBuf,
    pub duration_secs: f64,
}

impl EncodeConfig {
    pub fn validate(&self) -> PagecastResult<()> {
        if self.fps == 0 {
            return Err(PagecastError::input("encode fps must be non-zero"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(PagecastError::input(
                "encode duration_secs must be finite and > 0",
            ));
        }
        if let Some(audio) = &self.audio
            && let AudioEncoding::RawF32le {
                sample_rate,
                channels,
            } = audio.encoding
        {
            if sample_rate == 0 {
                return Err(PagecastError::input(
                    "audio sample_rate must be non-zero when audio is enabled",
                ));
            }
            if channels == 0 {
                return Err(PagecastError::input(
                    "audio channels must be non-zero when audio is enabled",
                ));
            }
        }
        Ok(())
    }

    /// Full ffmpeg argument list, writing to `tmp_path` instead of the final
    /// output so a failed or cancelled run never leaves a partial MP4 behind.
    pub fn command_args(&self, tmp_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |s: &str| args.push(OsString::from(s));

        if self.overwrite {
            push("-y");
        } else {
            push("-n");
        }
        push("-loglevel");
        push("error");

        push("-framerate");
        push(&self.fps.to_string());
        push("-i");
        args.push(self.frame_pattern.clone().into_os_string());

        if let Some(audio) = &self.audio {
            if let AudioEncoding::RawF32le {
                sample_rate,
                channels,
            } = audio.encoding
            {
                args.push(OsString::from("-f"));
                args.push(OsString::from("f32le"));
                args.push(OsString::from("-ar"));
                args.push(OsString::from(sample_rate.to_string()));
                args.push(OsString::from("-ac"));
                args.push(OsString::from(channels.to_string()));
            }
            args.push(OsString::from("-i"));
            args.push(audio.path.clone().into_os_string());
        }

        for s in ["-c:v", "libx264", "-pix_fmt", "yuv420p"] {
            args.push(OsString::from(s));
        }
        if self.audio.is_some() {
            args.push(OsString::from("-c:a"));
            args.push(OsString::from("aac"));
        } else {
            args.push(OsString::from("-an"));
        }

        // -t pins the container to the requested duration; audio shorter
        // than the video is left to end early rather than truncating video.
        args.push(OsString::from("-t"));
        args.push(OsString::from(format!("{:.6}", self.duration_secs)));
        for s in ["-movflags", "+faststart", "-f", "mp4"] {
            args.push(OsString::from(s));
        }
        args.push(tmp_path.as_os_str().to_os_string());
        args
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> PagecastResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn temp_out_path(out_path: &Path) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let stem = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.mp4".to_string());
    let name = format!(".{}_{}_{}.part", stem, std::process::id(), nanos);
    match out_path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Encode the frame sequence (and optional narration audio) into the final
/// MP4 at `cfg.out_path`.
///
/// The encoder writes to a hidden `.part` sibling and renames on success, so
/// cancellation or an ffmpeg failure never leaves output at the target path.
#[tracing::instrument(skip_all, fields(out = %cfg.out_path.display()))]
pub fn encode_video(cfg: &EncodeConfig, cancel: &CancelToken) -> PagecastResult<VideoOutput> {
    cfg.validate()?;
    cancel.checkpoint("encoding")?;
    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(PagecastError::encode(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    if !is_ffmpeg_on_path() {
        return Err(PagecastError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let tmp_path = temp_out_path(&cfg.out_path);
    let mut tmp_guard = TempFileGuard(Some(tmp_path.clone()));

    let mut cmd = Command::new("ffmpeg");
    cmd.args(cfg.command_args(&tmp_path))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        PagecastError::encode(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| PagecastError::encode("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok::<Vec<u8>, std::io::Error>(stderr_bytes)
    });

    // Poll so a cancellation can stop ffmpeg promptly instead of waiting for
    // the full encode to finish.
    let status = loop {
        if cancel.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            let _ = stderr_drain.join();
            return Err(PagecastError::cancelled("job cancelled during encoding"));
        }
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => std::thread::sleep(Duration::from_millis(25)),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stderr_drain.join();
                return Err(PagecastError::encode(format!(
                    "failed to wait for ffmpeg: {e}"
                )));
            }
        }
    };

    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| PagecastError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| PagecastError::encode(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes);
        return Err(PagecastError::encode(format!(
            "ffmpeg exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }

    let meta = std::fs::metadata(&tmp_path)
        .with_context(|| format!("stat encoded file '{}'", tmp_path.display()))?;
    if meta.len() == 0 {
        return Err(PagecastError::encode(
            "ffmpeg reported success but produced an empty file",
        ));
    }

    std::fs::rename(&tmp_path, &cfg.out_path).with_context(|| {
        format!(
            "move encoded file '{}' to '{}'",
            tmp_path.display(),
            cfg.out_path.display()
        )
    })?;
    tmp_guard.0 = None;

    tracing::debug!(bytes = meta.len(), "mp4 encode complete");
    Ok(VideoOutput {
        path: cfg.out_path.clone(),
        duration_secs: cfg.duration_secs,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
