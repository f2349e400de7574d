//! Integration tests for generating a font through the cache and laying
//! text out with the resulting instance.

use lumen_core::{CpuTextureStore, Rect, TextureStore};
use lumen_text::{
    layout_glyph_quads, layout_string, CharRange, FontCache, FontCacheConfig, FontError, FontFace,
    FontInstance, FontLoader, FontRenderStyle, FontSize, FontSource, FontStyle, GlyphBitmap,
    StringComponent, StringSizing, TextAlign, WordWrap,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Face where every glyph is `size / 2` wide and `size` tall, and
/// lowercase letters are half-covered.
struct BlockFace {
    size: u32,
}

impl FontFace for BlockFace {
    fn line_height(&self) -> u32 {
        self.size
    }

    fn glyph_size(&self, ch: char) -> Option<(u32, u32)> {
        if ch == '~' {
            return None;
        }
        Some((self.size / 2, self.size))
    }

    fn rasterize(&mut self, ch: char, render_style: FontRenderStyle) -> Option<GlyphBitmap> {
        let (width, height) = self.glyph_size(ch)?;
        let value = match (ch.is_ascii_lowercase(), render_style) {
            (true, FontRenderStyle::Blended) => 128,
            (true, FontRenderStyle::Solid) => 0,
            (false, _) => 255,
        };
        Some(GlyphBitmap {
            width,
            height,
            coverage: vec![value; width as usize * height as usize],
        })
    }
}

struct BlockLoader;

impl FontLoader for BlockLoader {
    fn open(
        &self,
        _source: &FontSource,
        size: FontSize,
        _style: FontStyle,
    ) -> Result<Box<dyn FontFace>, FontError> {
        Ok(Box::new(BlockFace { size: u32::from(size) }))
    }
}

fn cache() -> FontCache {
    init_logging();
    let mut cache = FontCache::with_loader(BlockLoader, FontCacheConfig::default());
    cache.register_font_bytes("block", Vec::new(), CharRange::PRINTABLE_ASCII);
    cache
}

/// Plain 16px blended instance of the block font.
fn block_16(cache: &mut FontCache, textures: &mut CpuTextureStore) -> Option<FontInstance> {
    cache.fetch_font_instance("block", 16, FontStyle::NORMAL, FontRenderStyle::Blended, textures)
}

#[test]
fn test_generated_atlas_is_power_of_two() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::new();
    let font = block_16(&mut cache, &mut textures).unwrap();

    let atlas = textures.texture(font.texture().unwrap()).unwrap();
    assert!(atlas.width.is_power_of_two());
    assert!(atlas.height.is_power_of_two());
    assert_eq!(font.height(), 16);
    assert_eq!(font.glyphs().len(), 95);

    for glyph in font.glyphs().iter().filter(|g| g.supported) {
        let uv = glyph.uv_rect;
        assert!(uv.x >= 0.0 && uv.y >= 0.0);
        assert!(uv.right() <= 1.0 && uv.bottom() <= 1.0);
    }
    assert!(!font.glyph('~').unwrap().supported);
}

#[test]
fn test_render_styles_differ_in_atlas() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::new();
    let blended = block_16(&mut cache, &mut textures).unwrap();
    let solid = cache
        .fetch_font_instance("block", 16, FontStyle::NORMAL, FontRenderStyle::Solid, &mut textures)
        .unwrap();
    assert_ne!(blended, solid);
    assert_eq!(textures.texture_count(), 2);

    let pixel_of = |instance: &FontInstance, ch: char| {
        let glyph = instance.glyph(ch).unwrap();
        let atlas = textures.texture(instance.texture().unwrap()).unwrap();
        let x = (glyph.uv_rect.x * atlas.width as f32) as u32;
        let y = (glyph.uv_rect.y * atlas.height as f32) as u32;
        atlas.pixel(x, y).unwrap()
    };
    assert_eq!(pixel_of(&blended, 'a'), [255, 255, 255, 128]);
    assert_eq!(pixel_of(&solid, 'a'), [255, 255, 255, 0]);
    assert_eq!(pixel_of(&solid, 'A'), [255, 255, 255, 255]);
}

#[test]
fn test_generation_fails_when_atlas_too_large() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::with_max_dimension(64);
    assert!(cache
        .fetch_font_instance("block", 48, FontStyle::BOLD, FontRenderStyle::Blended, &mut textures)
        .is_none());
    assert_eq!(textures.texture_count(), 0);
    assert_eq!(textures.max_texture_dimension(), 64);
}

#[test]
fn test_greedy_layout_with_generated_font() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::new();
    let font = block_16(&mut cache, &mut textures).unwrap();

    // 8px glyphs; "one two" is 56px, "one two three" is 104px.
    let components = [StringComponent::new("one two three", &font)];
    let rect = Rect::new(0.0, 0.0, 60.0, 100.0);
    let layout = layout_string(&components, &rect, WordWrap::Greedy);

    assert_eq!(layout.lines.len(), 2);
    let first: String = layout.lines[0].glyphs.iter().map(|g| g.glyph.character).collect();
    let second: String = layout.lines[1].glyphs.iter().map(|g| g.glyph.character).collect();
    assert_eq!(first, "one two");
    assert_eq!(second, "three");
    assert_eq!(layout.total_height, 32.0);
}

#[test]
fn test_fixed_height_sizing_scales_quads() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::new();
    let font = block_16(&mut cache, &mut textures).unwrap();

    let components = [StringComponent::new("AB", &font).with_sizing(StringSizing::Fixed {
        scale_x: 1.0,
        target_height: 32.0,
    })];
    let rect = Rect::new(10.0, 20.0, 200.0, 100.0);
    let quads = layout_glyph_quads(&components, &rect, WordWrap::None, TextAlign::TopLeft);

    assert_eq!(quads.len(), 2);
    assert_eq!(quads[0].size.y, 32.0);
    assert_eq!(quads[0].position.x, 10.0);
    assert_eq!(quads[0].position.y, 20.0);
    assert_eq!(quads[1].position.x, 18.0);
    assert_eq!(quads[0].texture, font.texture());
}

#[test]
fn test_dispose_releases_every_atlas() {
    let mut cache = cache();
    let mut textures = CpuTextureStore::new();
    for size in [12, 16, 24] {
        let blended = FontRenderStyle::Blended;
        cache.fetch_font_instance("block", size, FontStyle::ITALIC, blended, &mut textures);
    }
    assert_eq!(textures.texture_count(), 3);
    assert!(cache.dispose_font("block", &mut textures));
    assert_eq!(textures.texture_count(), 0);
}
