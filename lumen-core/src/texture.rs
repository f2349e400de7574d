//! Texture handles and the texture-store seam.
//!
//! Font atlases and the sprite batcher's default texture are created
//! through [`TextureStore`], so they work the same against the wgpu
//! renderer, the recording backend used in tests, or the in-memory
//! [`CpuTextureStore`] (which can also dump textures to PNG for
//! debugging).

use std::num::NonZeroU32;
use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Opaque handle to a texture owned by a [`TextureStore`].
///
/// Handles are never zero, so `Option<TextureId>` is the same size as
/// `TextureId`. Ordering follows the raw handle value, which is what the
/// sprite batcher's texture sort uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    /// Wrap a raw handle. Returns `None` for 0.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Hands out texture handles in increasing order, starting at 1.
///
/// Handles are never reused; once `u32::MAX` has been issued every
/// further allocation fails.
#[derive(Clone, Copy, Debug)]
pub struct TextureIds {
    next: Option<NonZeroU32>,
}

impl TextureIds {
    pub fn new() -> Self {
        Self {
            next: Some(NonZeroU32::MIN),
        }
    }

    /// Allocator whose first handle is `first` (none at all for 0).
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: NonZeroU32::new(first),
        }
    }

    pub fn allocate(&mut self) -> Result<TextureId, TextureError> {
        let id = self.next.ok_or(TextureError::HandlesExhausted)?;
        self.next = id.checked_add(1);
        Ok(TextureId(id))
    }
}

impl Default for TextureIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel rectangle inside a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width × height` texture.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Invalid texture size {width}×{height} (device maximum {max})")]
    InvalidSize { width: u32, height: u32, max: u32 },
    #[error("Unknown texture {0:?}")]
    Unknown(TextureId),
    #[error("Region {region:?} exceeds texture bounds {width}×{height}")]
    OutOfBounds {
        region: TextureRegion,
        width: u32,
        height: u32,
    },
    #[error("No texture handles left")]
    HandlesExhausted,
    #[error("Pixel data too short: expected {expected} bytes, got {actual}")]
    DataLength { expected: usize, actual: usize },
    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Creates, fills and destroys RGBA8 textures.
pub trait TextureStore {
    /// Largest width or height a texture may have.
    fn max_texture_dimension(&self) -> u32;

    /// Allocate a zero-filled RGBA8 texture.
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, TextureError>;

    /// Overwrite `region` with tightly packed RGBA8 pixels.
    fn write_texture(
        &mut self,
        texture: TextureId,
        region: TextureRegion,
        rgba: &[u8],
    ) -> Result<(), TextureError>;

    /// Release a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, texture: TextureId);
}

/// Validate a texture size against a device limit.
pub fn check_texture_size(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TextureError::InvalidSize { width, height, max });
    }
    Ok(())
}

/// Validate a write of `data_len` bytes into `region` of a `width × height` texture.
pub fn check_texture_write(
    region: TextureRegion,
    width: u32,
    height: u32,
    data_len: usize,
) -> Result<(), TextureError> {
    let fits_x = region.x.checked_add(region.width).is_some_and(|r| r <= width);
    let fits_y = region.y.checked_add(region.height).is_some_and(|b| b <= height);
    if !fits_x || !fits_y {
        return Err(TextureError::OutOfBounds {
            region,
            width,
            height,
        });
    }

    let expected = region.width as usize * region.height as usize * 4;
    if data_len < expected {
        return Err(TextureError::DataLength {
            expected,
            actual: data_len,
        });
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────────
// CPU texture store
// ───────────────────────────────────────────────────────────────────

/// An RGBA8 texture held in main memory.
#[derive(Clone, Debug)]
pub struct CpuTexture {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data (width * height * 4 bytes).
    pub pixels: Vec<u8>,
}

impl CpuTexture {
    /// RGBA value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// In-memory [`TextureStore`].
pub struct CpuTextureStore {
    textures: FxHashMap<TextureId, CpuTexture>,
    ids: TextureIds,
    max_dimension: u32,
}

impl CpuTextureStore {
    /// Default maximum texture dimension, matching common desktop GPUs.
    pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

    pub fn new() -> Self {
        Self::with_max_dimension(Self::DEFAULT_MAX_DIMENSION)
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            textures: FxHashMap::default(),
            ids: TextureIds::new(),
            max_dimension,
        }
    }

    pub fn texture(&self, id: TextureId) -> Option<&CpuTexture> {
        self.textures.get(&id)
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Write a texture to disk as a PNG. Debugging aid only.
    pub fn export_png(&self, id: TextureId, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let texture = self.textures.get(&id).ok_or(TextureError::Unknown(id))?;
        let image =
            image::RgbaImage::from_raw(texture.width, texture.height, texture.pixels.clone())
                .ok_or(TextureError::DataLength {
                    expected: texture.width as usize * texture.height as usize * 4,
                    actual: texture.pixels.len(),
                })?;
        image.save(path.as_ref())?;
        log::debug!(
            "Exported texture {:?} ({}×{}) to {}",
            id,
            texture.width,
            texture.height,
            path.as_ref().display(),
        );
        Ok(())
    }
}

impl Default for CpuTextureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureStore for CpuTextureStore {
    fn max_texture_dimension(&self) -> u32 {
        self.max_dimension
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, TextureError> {
        check_texture_size(width, height, self.max_dimension)?;

        let id = self.ids.allocate()?;

        self.textures.insert(
            id,
            CpuTexture {
                width,
                height,
                pixels: vec![0u8; width as usize * height as usize * 4],
            },
        );
        Ok(id)
    }

    fn write_texture(
        &mut self,
        texture: TextureId,
        region: TextureRegion,
        rgba: &[u8],
    ) -> Result<(), TextureError> {
        let target = self
            .textures
            .get_mut(&texture)
            .ok_or(TextureError::Unknown(texture))?;
        check_texture_write(region, target.width, target.height, rgba.len())?;

        let row_bytes = region.width as usize * 4;
        for row in 0..region.height as usize {
            let src = row * row_bytes;
            let dst = ((region.y as usize + row) * target.width as usize + region.x as usize) * 4;
            target.pixels[dst..dst + row_bytes].copy_from_slice(&rgba[src..src + row_bytes]);
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }
}

// ===================================================================
// Tests
// ===================================================================
