use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::encode::ffmpeg::{self, AudioInput, EncodeConfig, VideoOutput};
use crate::foundation::core::VideoSpec;
use crate::foundation::error::{PagecastError, PagecastResult};
use crate::frames::generator::{self, FrameThreading};
use crate::frames::layout::FrameStyle;
use crate::pipeline::cancel::CancelToken;
use crate::speech::synthesizer::{SpeechOptions, SpeechSynthesizer};
use crate::text::extract::{self, NarrationText};

/// Pipeline stage a job is currently in, for status reporting and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum JobStage {
    Idle,
    ValidatingInputs,
    SynthesizingAudio,
    GeneratingFrames,
    Encoding,
    Done,
    Failed,
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ValidatingInputs => "validating inputs",
            Self::SynthesizingAudio => "synthesizing audio",
            Self::GeneratingFrames => "generating frames",
            Self::Encoding => "encoding",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything needed to turn one HTML document into a narrated MP4.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Raw HTML of the page to narrate.
    pub html: String,
    #[serde(default)]
    pub speech: SpeechOptions,
    pub video: VideoSpec,
    #[serde(default)]
    pub style: FrameStyle,
    #[serde(default)]
    pub threading: FrameThreading,
    pub out_path: PathBuf,
}

impl RenderRequest {
    pub fn new(html: impl Into<String>, video: VideoSpec, out_path: impl Into<PathBuf>) -> Self {
        Self {
            html: html.into(),
            speech: SpeechOptions::default(),
            video,
            style: FrameStyle::default(),
            threading: FrameThreading::default(),
            out_path: out_path.into(),
        }
    }

    pub fn from_json_str(json: &str) -> PagecastResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PagecastError::input(format!("invalid render request json: {e}")))
    }

    pub fn from_path(path: &Path) -> PagecastResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read render request '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Validate the request and extract its narration text.
    ///
    /// Runs before any scratch space is created or external process spawned,
    /// so a bad request leaves no trace on disk.
    pub fn validate(&self) -> PagecastResult<NarrationText> {
        let narration = extract::extract_text(&self.html);
        if narration.is_empty() {
            return Err(PagecastError::input(
                "document contains no narratable text after markup removal",
            ));
        }
        self.speech.validate()?;
        self.video.validate()?;
        self.style.validate()?;
        Ok(narration)
    }
}

/// Per-job scratch directory, removed when the job ends however it ends.
///
/// Lives under the pipeline's scratch base and is named uniquely per process
/// and instant so concurrent jobs never collide.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub(crate) fn create(base: &Path) -> PagecastResult<Self> {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = base.join(format!("pagecast_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create scratch dir '{}'", path.display()))?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(
                dir = %self.path.display(),
                error = %e,
                "failed to remove job scratch directory"
            );
        }
    }
}

/// Drive one render request through every stage.
///
/// Stages run strictly in order: validate, synthesize narration audio,
/// rasterize the frame sequence, mux with ffmpeg. CPU-bound stages run on
/// blocking threads so the async caller stays responsive to cancellation.
#[tracing::instrument(skip_all, fields(out = %request.out_path.display()))]
pub(crate) async fn run_job(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    scratch_base: &Path,
    request: RenderRequest,
    cancel: CancelToken,
) -> PagecastResult<VideoOutput> {
    tracing::info!(stage = %JobStage::ValidatingInputs, "job started");
    let narration = request.validate()?;
    cancel.checkpoint("input validation")?;

    let scratch = ScratchDir::create(scratch_base)?;

    tracing::info!(stage = %JobStage::SynthesizingAudio, words = narration.word_count(), "narration extracted");
    let audio_path = scratch
        .path()
        .join(format!("narration.{}", synthesizer.audio_extension()));
    let artifact = synthesizer
        .synthesize(&narration, &request.speech, &audio_path, &cancel)
        .await?;
    artifact.verify_durable()?;
    let audio_duration = artifact.resolve_duration()?;
    if audio_duration < request.video.duration_secs {
        tracing::debug!(
            audio_duration,
            video_duration = request.video.duration_secs,
            "narration audio is shorter than the video and will end early"
        );
    }

    tracing::info!(stage = %JobStage::GeneratingFrames, frames = request.video.frame_count(), "audio ready");
    let frames_dir = scratch.path().join("frames");
    let frame_set = {
        let narration = narration.clone();
        let video = request.video;
        let style = request.style.clone();
        let threading = request.threading;
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            generator::generate_frames(&narration, &video, &style, &frames_dir, &threading, &cancel)
        })
        .await
        .map_err(|e| PagecastError::frame_generation(format!("frame task panicked: {e}")))??
    };
    frame_set.verify_complete()?;

    tracing::info!(stage = %JobStage::Encoding, "frame sequence ready");
    let cfg = EncodeConfig {
        frame_pattern: frame_set.pattern(),
        fps: request.video.fps.num,
        audio: Some(AudioInput {
            path: artifact.path.clone(),
            encoding: artifact.encoding,
        }),
        duration_secs: request.video.duration_secs,
        out_path: request.out_path.clone(),
        overwrite: true,
    };
    let output = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || ffmpeg::encode_video(&cfg, &cancel))
            .await
            .map_err(|e| PagecastError::encode(format!("encode task panicked: {e}")))??
    };

    tracing::info!(stage = %JobStage::Done, out = %output.path.display(), "job complete");
    Ok(output)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/job.rs"]
mod tests;
