//! Pagecast turns a web page into a narrated video.
//!
//! The pipeline runs four stages in order:
//!
//! - Extract narration text from raw HTML
//! - Synthesize the narration to an audio file via a [`SpeechSynthesizer`]
//! - Rasterize the text into a scrolling PNG frame sequence
//! - Mux frames and audio into an MP4 with the system `ffmpeg`
//!
//! The public API is pipeline-oriented: build a [`RenderRequest`], hand it to
//! a [`Pipeline`], and await the [`VideoOutput`]. Submitting a new request
//! cancels any job still in flight.
#![forbid(unsafe_code)]

pub mod audio;
pub mod encode;
mod foundation;
pub mod frames;
pub mod pipeline;
pub mod speech;
pub mod text;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, VideoSpec};
pub use crate::foundation::error::{PagecastError, PagecastResult};

pub use crate::audio::pcm::AudioEncoding;
pub use crate::encode::ffmpeg::{AudioInput, EncodeConfig, VideoOutput, is_ffmpeg_on_path};
pub use crate::frames::generator::{FrameSet, FrameThreading};
pub use crate::frames::layout::{FontSource, FrameStyle};
pub use crate::pipeline::cancel::CancelToken;
pub use crate::pipeline::job::{JobStage, RenderRequest};
pub use crate::pipeline::orchestrator::Pipeline;
pub use crate::speech::synthesizer::{
    AudioArtifact, Locale, SpeechOptions, SpeechSynthesizer, ToneSynthesizer,
};
pub use crate::text::extract::{NarrationText, extract_text};
