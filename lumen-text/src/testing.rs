//! Synthetic fonts for unit tests.

use lumen_core::{Rect, TextureId, Vec2};

use crate::font::{FontError, FontInstance, Glyph};
use crate::raster::{FontFace, FontLoader, FontSource, GlyphBitmap};
use crate::style::{CharRange, FontRenderStyle, FontSize, FontStyle};

/// Loader whose every glyph is a solid `advance × line_height` block.
#[derive(Clone, Debug)]
pub struct FixedPitchLoader {
    pub advance: u32,
    pub line_height: u32,
    /// Characters reported as missing from the font.
    pub unsupported: Vec<char>,
    /// Extra pixels each rasterised bitmap spills past its measured cell.
    pub overhang: u32,
}

impl Default for FixedPitchLoader {
    fn default() -> Self {
        Self {
            advance: 8,
            line_height: 16,
            unsupported: Vec::new(),
            overhang: 0,
        }
    }
}

impl FontLoader for FixedPitchLoader {
    fn open(
        &self,
        _source: &FontSource,
        _size: FontSize,
        _style: FontStyle,
    ) -> Result<Box<dyn FontFace>, FontError> {
        Ok(Box::new(self.clone()))
    }
}

impl FontFace for FixedPitchLoader {
    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn glyph_size(&self, ch: char) -> Option<(u32, u32)> {
        if self.unsupported.contains(&ch) {
            return None;
        }
        Some((self.advance, self.line_height))
    }

    fn rasterize(&mut self, ch: char, _render_style: FontRenderStyle) -> Option<GlyphBitmap> {
        let (width, height) = self.glyph_size(ch)?;
        let (width, height) = (width + self.overhang, height + self.overhang);
        Some(GlyphBitmap {
            width,
            height,
            coverage: vec![255; width as usize * height as usize],
        })
    }
}

/// Printable-ASCII instance where every glyph is `advance × height`.
pub fn fixed_pitch_instance(advance: f32, height: u32) -> FontInstance {
    let range = CharRange::PRINTABLE_ASCII;
    let glyphs = range
        .chars()
        .map(|character| Glyph {
            character,
            uv_rect: Rect::UNIT,
            size: Vec2::new(advance, height as f32),
            supported: true,
        })
        .collect();
    let texture = TextureId::new(1).expect("non-zero id");
    FontInstance::from_parts(texture, height, range, glyphs)
}
