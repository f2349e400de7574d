//! Fonts and their generated instances.
//!
//! A [`Font`] is a font source plus a character range. Each
//! `(size, style, render style)` combination is generated once into a
//! [`FontInstance`]: one atlas texture holding every supported glyph of
//! the range, and the glyph table describing where each one lives.
//!
//! ```text
//! Font::generate
//!     │  FontLoader::open  ──► FontFace
//!     │  glyph_size(ch) for ch in range
//!     │  pack_glyphs(...)  ──► AtlasLayout
//!     │  rasterize + blit  ──► AtlasBitmap
//!     ▼  TextureStore::create_texture / write_texture
//! FontInstance { texture, height, glyphs: Arc<[Glyph]> }
//! ```
//!
//! Instances are cheap handles: the glyph table is shared, so copies
//! taken by callers stay valid for as long as they are held, even after
//! the font is disposed (the texture, however, is gone).

use std::path::PathBuf;
use std::sync::Arc;

use lumen_core::{Rect, TextureError, TextureId, TextureRegion, TextureStore, Vec2};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::atlas::{pack_glyphs, AtlasBitmap, PackError};
use crate::raster::{FontLoader, FontSource};
use crate::style::{
    font_instance_hash, CharRange, FontInstanceHash, FontRenderStyle, FontSize, FontStyle,
};

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font instance already generated (size {size}, style {style:?}, {render_style:?})")]
    AlreadyGenerated {
        size: FontSize,
        style: FontStyle,
        render_style: FontRenderStyle,
    },
    #[error("Failed to read font file {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("Not a usable font: {0}")]
    InvalidFont(String),
    #[error("Font has no glyphs in range {0:?}")]
    NoGlyphs(CharRange),
    #[error("Glyph packing failed: {0}")]
    Packing(#[from] PackError),
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
    #[error("Unknown font '{0}'")]
    UnknownFont(String),
    #[error("System font lookup failed: {0}")]
    SystemFont(String),
}

/// One character of a font instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub character: char,
    /// Normalised region of the atlas holding this glyph.
    pub uv_rect: Rect,
    /// Cell size in pixels.
    pub size: Vec2,
    /// Whether the font has a glyph for this character.
    pub supported: bool,
}

impl Glyph {
    fn unsupported(character: char) -> Self {
        Self {
            character,
            uv_rect: Rect::default(),
            size: Vec2::ZERO,
            supported: false,
        }
    }
}

/// A generated font instance: atlas texture, line height and glyphs.
///
/// Two instances are equal when they share texture, height and glyph
/// table (the table is compared by identity).
#[derive(Clone, Debug)]
pub struct FontInstance {
    texture: Option<TextureId>,
    height: u32,
    range: CharRange,
    glyphs: Option<Arc<[Glyph]>>,
}

impl FontInstance {
    /// The "no font" instance. Laying text out with it yields nothing.
    pub fn nil() -> Self {
        Self {
            texture: None,
            height: 0,
            range: CharRange::default(),
            glyphs: None,
        }
    }

    /// Assemble an instance from an existing atlas texture and glyph
    /// table. `glyphs[i]` describes character `range.start() + i`.
    pub fn from_parts(
        texture: TextureId,
        height: u32,
        range: CharRange,
        glyphs: Vec<Glyph>,
    ) -> Self {
        debug_assert_eq!(glyphs.len(), range.len(), "glyph table does not match range");
        Self {
            texture: Some(texture),
            height,
            range,
            glyphs: Some(glyphs.into()),
        }
    }

    pub fn is_nil(&self) -> bool {
        self.glyphs.is_none()
    }

    /// Atlas texture, `None` for the nil instance.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Line height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn range(&self) -> CharRange {
        self.range
    }

    /// All glyphs of the range, supported or not.
    pub fn glyphs(&self) -> &[Glyph] {
        self.glyphs.as_deref().unwrap_or(&[])
    }

    /// Glyph for `ch`, if it lies in the range.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs().get(self.range.index_of(ch)?)
    }

    /// Glyph for `ch`, if it lies in the range and the font supports it.
    pub fn supported_glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyph(ch).filter(|g| g.supported)
    }
}

impl Default for FontInstance {
    fn default() -> Self {
        Self::nil()
    }
}

impl PartialEq for FontInstance {
    fn eq(&self, other: &Self) -> bool {
        let same_glyphs = match (&self.glyphs, &other.glyphs) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_glyphs && self.texture == other.texture && self.height == other.height
    }
}

/// A font source, its character range and every generated instance.
pub struct Font {
    source: FontSource,
    range: CharRange,
    default_size: FontSize,
    instances: FxHashMap<FontInstanceHash, FontInstance>,
}

impl Font {
    pub fn new(source: FontSource, range: CharRange, default_size: FontSize) -> Self {
        Self {
            source,
            range,
            default_size,
            instances: FxHashMap::default(),
        }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn range(&self) -> CharRange {
        self.range
    }

    pub fn default_size(&self) -> FontSize {
        self.default_size
    }

    /// Number of generated instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Rasterise and pack the instance `(size, style, render_style)`.
    ///
    /// Fails with [`FontError::AlreadyGenerated`] if that instance
    /// exists; the existing instance is left untouched.
    pub fn generate(
        &mut self,
        size: FontSize,
        padding: u32,
        style: FontStyle,
        render_style: FontRenderStyle,
        loader: &dyn FontLoader,
        textures: &mut dyn TextureStore,
    ) -> Result<FontInstance, FontError> {
        let hash = font_instance_hash(size, style, render_style);
        if self.instances.contains_key(&hash) {
            return Err(FontError::AlreadyGenerated {
                size,
                style,
                render_style,
            });
        }

        let mut face = loader.open(&self.source, size, style)?;
        let height = face.line_height();

        // Measure every character; unsupported ones are kept in the
        // table but left out of the atlas.
        let mut glyphs: Vec<Glyph> = Vec::with_capacity(self.range.len());
        let mut packed: Vec<usize> = Vec::new();
        let mut sizes: Vec<(u32, u32)> = Vec::new();
        for ch in self.range.chars() {
            match face.glyph_size(ch) {
                Some((w, h)) => {
                    packed.push(glyphs.len());
                    sizes.push((w, h));
                    glyphs.push(Glyph {
                        character: ch,
                        uv_rect: Rect::default(),
                        size: Vec2::new(w as f32, h as f32),
                        supported: true,
                    });
                }
                None => glyphs.push(Glyph::unsupported(ch)),
            }
        }
        if sizes.is_empty() {
            return Err(FontError::NoGlyphs(self.range));
        }

        let layout = pack_glyphs(&sizes, padding, textures.max_texture_dimension())?;
        let mut bitmap = AtlasBitmap::new(layout.width, layout.height);

        for (slot, &glyph_index) in packed.iter().enumerate() {
            let placement = layout.placements[slot];
            let glyph = &mut glyphs[glyph_index];
            let (cell_width, cell_height) = sizes[slot];
            match face.rasterize(glyph.character, render_style) {
                // Nothing may spill out of the measured cell into padding.
                Some(raster) => {
                    let raster = raster.cropped(cell_width, cell_height);
                    bitmap.blit(
                        placement.x,
                        placement.y,
                        raster.width,
                        raster.height,
                        &raster.coverage,
                    );
                }
                None => log::warn!("Glyph {:?} measured but not rasterised", glyph.character),
            }
            if let Some(uv) = layout.uv_rect(slot) {
                glyph.uv_rect = uv;
            }
        }

        let texture = textures.create_texture(layout.width, layout.height)?;
        if let Err(e) = textures.write_texture(
            texture,
            TextureRegion::full(layout.width, layout.height),
            &bitmap.data,
        ) {
            textures.destroy_texture(texture);
            return Err(e.into());
        }

        log::info!(
            "Generated font instance {} @ {}px {:?} {:?}: {} glyphs, {}×{} atlas",
            self.source,
            size,
            style,
            render_style,
            sizes.len(),
            layout.width,
            layout.height,
        );

        let instance = FontInstance::from_parts(texture, height, self.range, glyphs);
        self.instances.insert(hash, instance.clone());
        Ok(instance)
    }

    /// [`generate`](Self::generate) with padding `size / 8`.
    pub fn generate_default_padding(
        &mut self,
        size: FontSize,
        style: FontStyle,
        render_style: FontRenderStyle,
        loader: &dyn FontLoader,
        textures: &mut dyn TextureStore,
    ) -> Result<FontInstance, FontError> {
        let padding = u32::from(size / 8);
        self.generate(size, padding, style, render_style, loader, textures)
    }

    /// [`generate`](Self::generate) at the font's default size.
    pub fn generate_default(
        &mut self,
        style: FontStyle,
        render_style: FontRenderStyle,
        loader: &dyn FontLoader,
        textures: &mut dyn TextureStore,
    ) -> Result<FontInstance, FontError> {
        self.generate_default_padding(self.default_size, style, render_style, loader, textures)
    }

    /// Previously generated instance, if any.
    pub fn font_instance(
        &self,
        size: FontSize,
        style: FontStyle,
        render_style: FontRenderStyle,
    ) -> Option<FontInstance> {
        self.instances
            .get(&font_instance_hash(size, style, render_style))
            .cloned()
    }

    /// Destroy every instance texture and forget the instances.
    pub fn dispose(&mut self, textures: &mut dyn TextureStore) {
        for (_, instance) in self.instances.drain() {
            if let Some(texture) = instance.texture {
                textures.destroy_texture(texture);
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
