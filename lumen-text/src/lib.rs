//! # lumen-text
//!
//! Bitmap-font text for the Lumen renderer: glyph atlas generation,
//! a named font cache, and string layout with word wrapping.
//!
//! ## Architecture
//!
//! ```text
//! FontCache (name → Font)
//!     │ fetch_font_instance(size, style, render_style)
//!     ▼
//! Font::generate ──► FontLoader/FontFace (swash) ──► pack_glyphs ──► TextureStore
//!     │
//!     ▼
//! FontInstance { texture, height, Arc<[Glyph]> }
//!     │
//!     ▼
//! layout_string(components, rect, wrap) ──► TextLayout ──► glyph_quads(align)
//! ```
//!
//! - **`style`** — Style flags, render styles, character ranges, instance hash.
//! - **`atlas`** — Row-based glyph packing and atlas bitmap stitching.
//! - **`raster`** — Font sources, the loader/face seam and the swash backend.
//! - **`font`** — Fonts, generated instances and glyph tables.
//! - **`cache`** — Named font registry with lazy instance generation.
//! - **`layout`** — Line breaking, alignment and glyph-quad emission.

pub mod atlas;
pub mod cache;
pub mod font;
pub mod layout;
pub mod raster;
pub mod style;

#[cfg(test)]
mod testing;

// Re-exports for ergonomic use.
pub use atlas::{pack_glyphs, AtlasBitmap, AtlasLayout, GlyphPlacement, PackError, PackedRow};
pub use cache::{FontCache, FontCacheConfig};
pub use font::{Font, FontError, FontInstance, Glyph};
pub use layout::{
    calculate_offset, glyph_quads, layout_glyph_quads, layout_string, DrawableGlyph,
    DrawableLine, GlyphQuad, StringComponent, StringSizing, TextAlign, TextLayout, WordWrap,
};
pub use raster::{FontFace, FontLoader, FontSource, GlyphBitmap, SwashLoader};
pub use style::{
    font_instance_hash, CharRange, FontInstanceHash, FontRenderStyle, FontSize, FontStyle,
};
