pub type PagecastResult<T> = Result<T, PagecastError>;

/// Error taxonomy for the render pipeline.
///
/// Each variant corresponds to one pipeline stage so that a failure message
/// always names the stage it came from. `Cancelled` is deliberate user/caller
/// action, not a fault, and callers should not surface it as an alert.
#[derive(thiserror::Error, Debug)]
pub enum PagecastError {
    #[error("input error: {0}")]
    Input(String),

    #[error("synthesis error: {0}")]
    Synthesis(String),

    #[error("frame generation error: {0}")]
    FrameGeneration(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PagecastError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    pub fn frame_generation(msg: impl Into<String>) -> Self {
        Self::FrameGeneration(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// `true` when the error is a cooperative cancellation, not a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Human-readable name of the stage this error belongs to.
    pub fn stage_name(&self) -> &'static str {
        match self {
            Self::Input(_) => "input validation",
            Self::Synthesis(_) => "speech synthesis",
            Self::FrameGeneration(_) => "frame generation",
            Self::Encode(_) => "encoding",
            Self::Cancelled(_) => "cancelled",
            Self::Other(_) => "internal",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
