use crate::foundation::error::{PagecastError, PagecastResult};

/// Zero-based frame index within a render.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> PagecastResult<Self> {
        if den == 0 {
            return Err(PagecastError::input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PagecastError::input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate shorthand (`num` fps, `den == 1`).
    pub fn whole(num: u32) -> PagecastResult<Self> {
        Self::new(num, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

/// Output pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Target shape of the rendered video: dimensions, pacing, and length.
///
/// `frame_count()` is the hard contract between the frame generator and the
/// encoder: both derive the expected sequence length from the same spec.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoSpec {
    pub canvas: Canvas,
    pub fps: Fps,
    pub duration_secs: f64,
}

impl VideoSpec {
    pub fn new(width: u32, height: u32, fps: u32, duration_secs: f64) -> PagecastResult<Self> {
        let spec = Self {
            canvas: Canvas { width, height },
            fps: Fps::whole(fps)?,
            duration_secs,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> PagecastResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PagecastError::input("video width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            // We target yuv420p mp4 output for maximum compatibility.
            return Err(PagecastError::input(
                "video width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(PagecastError::input(
                "video width/height must fit the CPU rasterizer surface (u16)",
            ));
        }
        if self.fps.den != 1 {
            return Err(PagecastError::input(
                "mp4 output currently requires integer fps (fps.den == 1)",
            ));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(PagecastError::input(
                "video duration_secs must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Total frames in the sequence: `round(fps * duration_secs)`, at least 1.
    pub fn frame_count(&self) -> u64 {
        ((self.fps.as_f64() * self.duration_secs).round() as u64).max(1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
