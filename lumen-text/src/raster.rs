//! Font loading and glyph rasterisation.
//!
//! Font generation talks to fonts only through [`FontLoader`] and
//! [`FontFace`], so atlases can be built from real font files with
//! [`SwashLoader`] or from synthetic faces in tests.
//!
//! Every glyph is rasterised into a fixed cell: the advance width by the
//! line height (ascent + descent), with the baseline at the ascent. This
//! keeps all glyphs of a line bottom-aligned without per-glyph bearings.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Angle, Format, Transform};
use swash::{CacheKey, FontRef};

use crate::font::FontError;
use crate::style::{FontRenderStyle, FontSize, FontStyle};

/// Where a font's data comes from.
#[derive(Clone, Debug)]
pub enum FontSource {
    /// A font file on disk; `index` selects the face within a collection.
    File { path: PathBuf, index: usize },
    /// Font data already in memory.
    Memory { data: Arc<Vec<u8>>, index: usize },
}

impl FontSource {
    /// First face of a font file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        FontSource::File {
            path: path.into(),
            index: 0,
        }
    }

    /// First face of in-memory font data.
    pub fn memory(data: Vec<u8>) -> Self {
        FontSource::Memory {
            data: Arc::new(data),
            index: 0,
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File { path, index } => write!(f, "{}#{}", path.display(), index),
            FontSource::Memory { data, index } => write!(f, "<{} bytes>#{}", data.len(), index),
        }
    }
}

/// 8-bit coverage bitmap of one glyph cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// One byte per pixel, row-major.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// An empty (fully transparent) cell.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0u8; width as usize * height as usize],
        }
    }

    /// The top-left `width × height` of this bitmap, or the whole bitmap
    /// if it already fits.
    pub fn cropped(self, width: u32, height: u32) -> GlyphBitmap {
        if self.width <= width && self.height <= height {
            return self;
        }
        let (w, h) = (self.width.min(width), self.height.min(height));
        let mut coverage = Vec::with_capacity(w as usize * h as usize);
        for row in self.coverage.chunks(self.width as usize).take(h as usize) {
            coverage.extend_from_slice(&row[..row.len().min(w as usize)]);
        }
        GlyphBitmap {
            width: w,
            height: h,
            coverage,
        }
    }

    /// Fill rows `y..y + thickness` completely, clamped to the cell.
    fn fill_rows(&mut self, y: i32, thickness: u32) {
        if self.height == 0 {
            return;
        }
        let thickness = thickness.clamp(1, self.height);
        let max_y = (self.height - thickness) as i32;
        let y = y.clamp(0, max_y) as u32;
        let start = (y * self.width) as usize;
        let end = ((y + thickness) * self.width) as usize;
        self.coverage[start..end].fill(255);
    }

    /// Threshold coverage to fully on or off.
    fn make_solid(&mut self) {
        for a in &mut self.coverage {
            *a = if *a >= 128 { 255 } else { 0 };
        }
    }
}

/// A font opened at one pixel size with one style applied.
pub trait FontFace {
    /// Height of every glyph cell, in pixels.
    fn line_height(&self) -> u32;

    /// Cell size of `ch`, or `None` if the font has no glyph for it.
    fn glyph_size(&self, ch: char) -> Option<(u32, u32)>;

    /// Rasterise `ch` into a cell of [`glyph_size`](Self::glyph_size).
    fn rasterize(&mut self, ch: char, render_style: FontRenderStyle) -> Option<GlyphBitmap>;
}

/// Opens font faces from a [`FontSource`].
pub trait FontLoader {
    fn open(
        &self,
        source: &FontSource,
        size: FontSize,
        style: FontStyle,
    ) -> Result<Box<dyn FontFace>, FontError>;
}

// ───────────────────────────────────────────────────────────────────
// swash backend
// ───────────────────────────────────────────────────────────────────

/// Outline stroke added for synthetic bold, in pixels.
const EMBOLDEN_STRENGTH: f32 = 1.0;

/// Horizontal shear for synthetic italics.
const ITALIC_SKEW_DEGREES: f32 = 14.0;

const SOURCES: [Source; 3] = [
    Source::ColorOutline(0),
    Source::ColorBitmap(StrikeWith::BestFit),
    Source::Outline,
];

/// [`FontLoader`] backed by swash.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwashLoader;

impl FontLoader for SwashLoader {
    fn open(
        &self,
        source: &FontSource,
        size: FontSize,
        style: FontStyle,
    ) -> Result<Box<dyn FontFace>, FontError> {
        let (data, index) = match source {
            FontSource::File { path, index } => {
                let bytes = std::fs::read(path).map_err(|error| FontError::Io {
                    path: path.clone(),
                    error,
                })?;
                (Arc::new(bytes), *index)
            }
            FontSource::Memory { data, index } => (Arc::clone(data), *index),
        };

        let font = FontRef::from_index(data.as_slice(), index)
            .ok_or_else(|| FontError::InvalidFont(source.to_string()))?;

        let (offset, key) = (font.offset, font.key);
        let px = f32::from(size);
        let metrics = font.metrics(&[]).scale(px);
        let ascent = metrics.ascent;
        let descent = metrics.descent.abs();
        let line_height = ((ascent + descent).ceil() as u32).max(1);

        log::debug!(
            "Opened font {} at {}px (line height {}, style {:?})",
            source,
            size,
            line_height,
            style
        );

        Ok(Box::new(SwashFace {
            data,
            offset,
            key,
            size: px,
            style,
            baseline: ascent.round() as i32,
            line_height,
            underline_offset: metrics.underline_offset,
            strikeout_offset: metrics.strikeout_offset,
            stroke_size: metrics.stroke_size,
            context: ScaleContext::new(),
        }))
    }
}

struct SwashFace {
    data: Arc<Vec<u8>>,
    offset: u32,
    key: CacheKey,
    size: f32,
    style: FontStyle,
    baseline: i32,
    line_height: u32,
    underline_offset: f32,
    strikeout_offset: f32,
    stroke_size: f32,
    context: ScaleContext,
}

impl SwashFace {
    fn font(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }

    fn stroke_thickness(&self) -> u32 {
        (self.stroke_size.round() as u32).max(1)
    }
}

impl FontFace for SwashFace {
    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn glyph_size(&self, ch: char) -> Option<(u32, u32)> {
        let font = self.font();
        let id = font.charmap().map(ch);
        if id == 0 {
            return None;
        }

        let mut advance = font.glyph_metrics(&[]).scale(self.size).advance_width(id);
        if self.style.contains(FontStyle::BOLD) {
            advance += EMBOLDEN_STRENGTH * 2.0;
        }
        Some(((advance.ceil() as u32).max(1), self.line_height))
    }

    fn rasterize(&mut self, ch: char, render_style: FontRenderStyle) -> Option<GlyphBitmap> {
        let (width, height) = self.glyph_size(ch)?;
        let mut cell = GlyphBitmap::new(width, height);

        let font = FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        };
        let id = font.charmap().map(ch);
        let italic = self.style.contains(FontStyle::ITALIC);

        let mut scaler = self
            .context
            .builder(font)
            .size(self.size)
            .hint(!italic)
            .build();

        let mut render = Render::new(&SOURCES);
        render.format(Format::Alpha);
        if self.style.contains(FontStyle::BOLD) {
            render.embolden(EMBOLDEN_STRENGTH);
        }
        if italic {
            render.transform(Some(Transform::skew(
                Angle::from_degrees(ITALIC_SKEW_DEGREES),
                Angle::from_degrees(0.0),
            )));
        }

        // Whitespace has no outline; its cell stays empty.
        if let Some(image) = render.render(&mut scaler, id) {
            let bpp = match image.content {
                Content::Mask => 1,
                Content::SubpixelMask | Content::Color => 4,
            };
            let p = image.placement;
            for row in 0..p.height as i32 {
                let y = self.baseline - p.top + row;
                if y < 0 || y >= height as i32 {
                    continue;
                }
                for col in 0..p.width as i32 {
                    let x = p.left + col;
                    if x < 0 || x >= width as i32 {
                        continue;
                    }
                    let src = (row as usize * p.width as usize + col as usize) * bpp;
                    // Alpha is the last byte of each source pixel.
                    let Some(&alpha) = image.data.get(src + bpp - 1) else {
                        continue;
                    };
                    let dst = y as usize * width as usize + x as usize;
                    cell.coverage[dst] = cell.coverage[dst].max(alpha);
                }
            }
        }

        if self.style.contains(FontStyle::UNDERLINE) {
            // Offsets are relative to the baseline, positive upward.
            let y = self.baseline - self.underline_offset.round() as i32;
            cell.fill_rows(y, self.stroke_thickness());
        }
        if self.style.contains(FontStyle::STRIKETHROUGH) {
            let y = self.baseline - self.strikeout_offset.round() as i32;
            cell.fill_rows(y, self.stroke_thickness());
        }

        if render_style == FontRenderStyle::Solid {
            cell.make_solid();
        }
        Some(cell)
    }
}

// ===================================================================
// Tests
// ===================================================================
