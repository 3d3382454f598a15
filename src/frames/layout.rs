use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{PagecastError, PagecastResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Where frame text gets its font from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FontSource {
    /// Scan the platform font directories and use the first face found
    /// (deterministic per machine: candidate paths are sorted).
    Discover,
    /// Load a specific font file (ttf/otf/ttc).
    File(PathBuf),
}

/// Visual style for generated narration frames.
///
/// `scroll_speed_px` is the per-frame upward shift of the text baseline;
/// the canvas clips whatever scrolls past its edges.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameStyle {
    pub font: FontSource,
    pub size_px: f32,
    pub color_rgba8: [u8; 4],
    pub background_rgba8: [u8; 4],
    pub scroll_speed_px: f32,
    pub margin_x_px: f32,
    pub max_width_px: Option<f32>,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            font: FontSource::Discover,
            size_px: 24.0,
            color_rgba8: [255, 255, 255, 255],
            background_rgba8: [0, 0, 0, 255],
            scroll_speed_px: 5.0,
            margin_x_px: 10.0,
            max_width_px: None,
        }
    }
}

impl FrameStyle {
    pub fn validate(&self) -> PagecastResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(PagecastError::input(
                "frame style size_px must be finite and > 0",
            ));
        }
        if !self.scroll_speed_px.is_finite() || self.scroll_speed_px < 0.0 {
            return Err(PagecastError::input(
                "frame style scroll_speed_px must be finite and >= 0",
            ));
        }
        if !self.margin_x_px.is_finite() {
            return Err(PagecastError::input(
                "frame style margin_x_px must be finite",
            ));
        }
        Ok(())
    }

    /// Resolve the style's font to raw face bytes.
    ///
    /// `Discover` returns `Ok(None)` when no platform font can be found;
    /// callers then render frames without text rather than failing the job.
    pub fn load_font_bytes(&self) -> PagecastResult<Option<Vec<u8>>> {
        match &self.font {
            FontSource::File(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read font file '{}'", path.display()))?;
                Ok(Some(bytes))
            }
            FontSource::Discover => match discover_font_file() {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("read font file '{}'", path.display()))?;
                    Ok(Some(bytes))
                }
                None => Ok(None),
            },
        }
    }
}

/// Find a usable font face in the platform font directories.
pub fn discover_font_file() -> Option<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        roots.push(home.join(".local/share/fonts"));
        roots.push(home.join(".fonts"));
    }

    let mut candidates = Vec::new();
    for root in roots {
        collect_font_files(&root, &mut candidates, 0);
    }
    candidates.sort();
    candidates.into_iter().next()
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>, depth: usize) {
    if depth > 4 {
        return;
    }
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out, depth + 1);
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext == "ttf" || ext == "otf" || ext == "ttc" {
            out.push(path);
        }
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out plain text using the provided font bytes.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: Option<f32>,
    ) -> PagecastResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PagecastError::input("text size_px must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PagecastError::input("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PagecastError::input("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }

        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/layout.rs"]
mod tests;
