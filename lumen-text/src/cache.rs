//! Named font registry with lazily generated instances.
//!
//! Fonts are registered under a name and generated on first use:
//! [`FontCache::fetch_font_instance`] returns the cached instance if one
//! exists, otherwise it rasterises a new one. Registration is
//! first-wins; re-registering a name is a no-op.

use std::path::Path;

use lumen_core::TextureStore;
use rustc_hash::FxHashMap;

use crate::font::{Font, FontError, FontInstance};
use crate::raster::{FontLoader, FontSource, SwashLoader};
use crate::style::{CharRange, FontRenderStyle, FontSize, FontStyle};

/// Font cache settings.
#[derive(Clone, Debug)]
pub struct FontCacheConfig {
    /// Size used by [`FontCache::fetch_default_font_instance`].
    pub default_size: FontSize,
    /// Range used by [`FontCache::register_font_default_range`].
    pub default_range: CharRange,
}

impl Default for FontCacheConfig {
    fn default() -> Self {
        Self {
            default_size: 16,
            default_range: CharRange::PRINTABLE_ASCII,
        }
    }
}

/// Name → [`Font`] map plus the loader used to generate instances.
pub struct FontCache {
    fonts: FxHashMap<String, Font>,
    loader: Box<dyn FontLoader>,
    config: FontCacheConfig,
}

impl FontCache {
    /// Cache that rasterises with swash.
    pub fn new() -> Self {
        Self::with_loader(SwashLoader, FontCacheConfig::default())
    }

    pub fn with_loader(loader: impl FontLoader + 'static, config: FontCacheConfig) -> Self {
        Self {
            fonts: FxHashMap::default(),
            loader: Box::new(loader),
            config,
        }
    }

    pub fn config(&self) -> &FontCacheConfig {
        &self.config
    }

    /// Number of registered fonts.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn font(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    /// Register a font from any source. Returns `false` if `name` is
    /// already taken.
    pub fn register_font_source(
        &mut self,
        name: &str,
        source: FontSource,
        range: CharRange,
    ) -> bool {
        if self.fonts.contains_key(name) {
            log::debug!("Font '{}' already registered", name);
            return false;
        }
        log::info!("Registered font '{}' from {} ({:?})", name, source, range);
        self.fonts
            .insert(name.to_string(), Font::new(source, range, self.config.default_size));
        true
    }

    /// Register a font file covering `range`.
    ///
    /// The file is not read until an instance is generated.
    pub fn register_font(&mut self, name: &str, path: impl AsRef<Path>, range: CharRange) -> bool {
        self.register_font_source(name, FontSource::file(path.as_ref()), range)
    }

    /// Register a font file covering the configured default range.
    pub fn register_font_default_range(&mut self, name: &str, path: impl AsRef<Path>) -> bool {
        let range = self.config.default_range;
        self.register_font(name, path, range)
    }

    /// Register in-memory font data.
    pub fn register_font_bytes(&mut self, name: &str, data: Vec<u8>, range: CharRange) -> bool {
        self.register_font_source(name, FontSource::memory(data), range)
    }

    /// Register the best system match for `family` under `name`.
    #[cfg(feature = "system-fonts")]
    pub fn register_system_font(
        &mut self,
        name: &str,
        family: &str,
        range: CharRange,
    ) -> Result<bool, FontError> {
        use font_kit::family_name::FamilyName;
        use font_kit::handle::Handle;
        use font_kit::properties::Properties;
        use font_kit::source::SystemSource;

        if self.fonts.contains_key(name) {
            return Ok(false);
        }

        let handle = SystemSource::new()
            .select_best_match(&[FamilyName::Title(family.to_string())], &Properties::new())
            .map_err(|e| FontError::SystemFont(format!("{family}: {e}")))?;

        let source = match handle {
            Handle::Path { path, font_index } => FontSource::File {
                path,
                index: font_index as usize,
            },
            Handle::Memory { bytes, font_index } => FontSource::Memory {
                data: bytes,
                index: font_index as usize,
            },
        };
        Ok(self.register_font_source(name, source, range))
    }

    /// Instance of font `name`, generating it on first request.
    ///
    /// Returns `None` if the font is unknown or generation fails (the
    /// failure is logged). Padding is `size / 8`.
    pub fn fetch_font_instance(
        &mut self,
        name: &str,
        size: FontSize,
        style: FontStyle,
        render_style: FontRenderStyle,
        textures: &mut dyn TextureStore,
    ) -> Option<FontInstance> {
        let Some(font) = self.fonts.get_mut(name) else {
            log::warn!("{}", FontError::UnknownFont(name.to_string()));
            return None;
        };

        if let Some(instance) = font.font_instance(size, style, render_style) {
            return Some(instance);
        }

        let loader = self.loader.as_ref();
        match font.generate_default_padding(size, style, render_style, loader, textures) {
            Ok(instance) => Some(instance),
            Err(e) => {
                log::warn!("Failed to generate font '{}' @ {}px: {}", name, size, e);
                None
            }
        }
    }

    /// [`fetch_font_instance`](Self::fetch_font_instance) at the default size.
    pub fn fetch_default_font_instance(
        &mut self,
        name: &str,
        style: FontStyle,
        render_style: FontRenderStyle,
        textures: &mut dyn TextureStore,
    ) -> Option<FontInstance> {
        let size = self.config.default_size;
        self.fetch_font_instance(name, size, style, render_style, textures)
    }

    /// Destroy font `name` and all its instances. Returns `false` if
    /// the name is unknown.
    pub fn dispose_font(&mut self, name: &str, textures: &mut dyn TextureStore) -> bool {
        match self.fonts.remove(name) {
            Some(mut font) => {
                font.dispose(textures);
                log::info!("Disposed font '{}'", name);
                true
            }
            None => false,
        }
    }

    /// Destroy every font.
    pub fn dispose(&mut self, textures: &mut dyn TextureStore) {
        for (_, mut font) in self.fonts.drain() {
            font.dispose(textures);
        }
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================
