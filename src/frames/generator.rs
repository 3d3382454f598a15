use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::foundation::core::{FrameIndex, VideoSpec};
use crate::foundation::error::{PagecastError, PagecastResult};
use crate::frames::layout::{FrameStyle, TextBrushRgba8, TextLayoutEngine};
use crate::pipeline::cancel::CancelToken;
use crate::text::extract::NarrationText;

/// Threading options for frame rasterization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameThreading {
    /// Rasterize frames on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Worker count when parallel; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// An on-disk sequence of numbered PNG frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSet {
    pub dir: PathBuf,
    pub count: u64,
    pub width: u32,
    pub height: u32,
}

impl FrameSet {
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index.0))
    }

    /// ffmpeg image2 input pattern matching `frame_path` naming.
    pub fn pattern(&self) -> PathBuf {
        self.dir.join("frame_%05d.png")
    }

    /// Check that every frame in the sequence exists and is non-empty.
    pub fn verify_complete(&self) -> PagecastResult<()> {
        for i in 0..self.count {
            let path = self.frame_path(FrameIndex(i));
            let meta = std::fs::metadata(&path).map_err(|e| {
                PagecastError::frame_generation(format!(
                    "missing frame '{}': {e}",
                    path.display()
                ))
            })?;
            if meta.len() == 0 {
                return Err(PagecastError::frame_generation(format!(
                    "frame '{}' is empty",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Shared per-job rasterization inputs, built once and handed to workers.
struct FramePlan {
    layout: Option<Arc<parley::Layout<TextBrushRgba8>>>,
    font: Option<vello_cpu::peniko::FontData>,
    width: u16,
    height: u16,
    style: FrameStyle,
}

/// Per-worker rasterizer owning a reusable render target.
struct FrameRasterizer {
    pixmap: vello_cpu::Pixmap,
}

impl FrameRasterizer {
    fn new(plan: &FramePlan) -> Self {
        Self {
            pixmap: vello_cpu::Pixmap::new(plan.width, plan.height),
        }
    }

    fn render_frame(&mut self, plan: &FramePlan, index: FrameIndex, path: &Path) -> PagecastResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(plan.width, plan.height);

        let bg = plan.style.background_rgba8;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg[0], bg[1], bg[2], bg[3]));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(plan.width),
            f64::from(plan.height),
        ));

        if let Some(layout) = &plan.layout
            && let Some(font) = &plan.font
        {
            // The first baseline starts at the bottom edge and climbs
            // scroll_speed_px per frame; anything past the canvas edge is
            // clipped. Glyph y positions are baselines relative to the layout
            // top (roughly one font size down), so shift the layout origin up
            // by that much.
            let origin_y = f64::from(plan.height)
                - (index.0 as f64) * f64::from(plan.style.scroll_speed_px)
                - f64::from(plan.style.size_px);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(plan.style.margin_x_px),
                origin_y,
            )));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        image::save_buffer_with_format(
            path,
            self.pixmap.data_as_u8_slice(),
            u32::from(plan.width),
            u32::from(plan.height),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Rasterize the narration text into a numbered PNG frame sequence.
///
/// The text is laid out once and shared across workers; each frame shifts
/// the baseline upward by the style's scroll speed. When no font can be
/// resolved the frames carry only the background color.
#[tracing::instrument(skip_all, fields(frames = spec.frame_count()))]
pub fn generate_frames(
    text: &NarrationText,
    spec: &VideoSpec,
    style: &FrameStyle,
    out_dir: &Path,
    threading: &FrameThreading,
    cancel: &CancelToken,
) -> PagecastResult<FrameSet> {
    spec.validate()?;
    style.validate()?;
    cancel.checkpoint("frame generation")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create frame dir '{}'", out_dir.display()))?;

    let width = u16::try_from(spec.canvas.width)
        .map_err(|_| PagecastError::input("canvas width exceeds rasterizer limit"))?;
    let height = u16::try_from(spec.canvas.height)
        .map_err(|_| PagecastError::input("canvas height exceeds rasterizer limit"))?;

    let font_bytes = style.load_font_bytes()?;
    let (layout, font) = match font_bytes {
        Some(bytes) => {
            let brush = TextBrushRgba8 {
                r: style.color_rgba8[0],
                g: style.color_rgba8[1],
                b: style.color_rgba8[2],
                a: style.color_rgba8[3],
            };
            let mut engine = TextLayoutEngine::new();
            let layout = engine.layout_plain(
                text.as_str(),
                &bytes,
                style.size_px,
                brush,
                style.max_width_px,
            )?;
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes),
                0,
            );
            (Some(Arc::new(layout)), Some(font))
        }
        None => {
            tracing::warn!("no font available, rendering background-only frames");
            (None, None)
        }
    };

    let plan = FramePlan {
        layout,
        font,
        width,
        height,
        style: style.clone(),
    };

    let count = spec.frame_count();
    let frame_set = FrameSet {
        dir: out_dir.to_path_buf(),
        count,
        width: spec.canvas.width,
        height: spec.canvas.height,
    };

    if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            (0..count)
                .collect::<Vec<u64>>()
                .par_iter()
                .map_init(
                    || FrameRasterizer::new(&plan),
                    |raster, i| -> PagecastResult<()> {
                        cancel.checkpoint("frame generation")?;
                        let index = FrameIndex(*i);
                        raster.render_frame(&plan, index, &frame_set.frame_path(index))
                    },
                )
                .collect::<PagecastResult<Vec<()>>>()
        })?;
    } else {
        let mut raster = FrameRasterizer::new(&plan);
        for i in 0..count {
            cancel.checkpoint("frame generation")?;
            let index = FrameIndex(i);
            raster.render_frame(&plan, index, &frame_set.frame_path(index))?;
        }
    }

    tracing::debug!(count, dir = %out_dir.display(), "frame sequence complete");
    Ok(frame_set)
}

fn build_thread_pool(threads: Option<usize>) -> PagecastResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PagecastError::input(
            "frame threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PagecastError::frame_generation(format!("failed to build thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/frames/generator.rs"]
mod tests;
