use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::encode::ffmpeg::VideoOutput;
use crate::foundation::error::PagecastResult;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::job::{self, RenderRequest};
use crate::speech::synthesizer::{SpeechSynthesizer, ToneSynthesizer};

/// Front door of the render pipeline.
///
/// Holds the synthesis backend and the scratch base, and enforces the
/// single-active-job policy: submitting a new request cancels whatever job is
/// still running (latest request wins), so two jobs never race for the same
/// engine or output file.
pub struct Pipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    scratch_base: PathBuf,
    active: Mutex<Option<CancelToken>>,
}

impl Pipeline {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, scratch_base: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            scratch_base: scratch_base.into(),
            active: Mutex::new(None),
        }
    }

    /// Pipeline with the built-in tone backend, scratching under the system
    /// temp directory.
    pub fn with_tone_synthesizer() -> Self {
        Self::new(Arc::new(ToneSynthesizer::default()), std::env::temp_dir())
    }

    /// Render one request to completion, superseding any job still running.
    pub async fn render(&self, request: RenderRequest) -> PagecastResult<VideoOutput> {
        let token = CancelToken::new();
        {
            let mut active = self
                .active
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(prior) = active.replace(token.clone()) {
                tracing::info!("superseding active job");
                prior.cancel();
            }
        }

        let result = job::run_job(
            Arc::clone(&self.synthesizer),
            &self.scratch_base,
            request,
            token.clone(),
        )
        .await;

        match &result {
            Err(e) if e.is_cancelled() => tracing::info!(error = %e, "job cancelled"),
            Err(e) => tracing::error!(stage = e.stage_name(), error = %e, "job failed"),
            Ok(_) => {}
        }

        // Only clear the slot if it still belongs to this job; a newer
        // request may already have replaced it.
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if active.as_ref().is_some_and(|t| t.same_job(&token)) {
            *active = None;
        }

        result
    }

    /// Cancel the in-flight job, if any. Idempotent.
    pub fn cancel_active(&self) {
        let active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = active.as_ref() {
            token.cancel();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
