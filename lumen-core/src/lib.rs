//! # lumen-core
//!
//! Leaf types shared by the Lumen text and render crates.
//!
//! ## Crate modules
//!
//! - [`geometry`] — `Vec2` and `Rect` (positions, sizes, UV rectangles)
//! - [`color`] — 8-bit colours and the gradient mixer
//! - [`clip`] — rectangle + UV clipping against a bounding rectangle
//! - [`texture`] — texture handles, the `TextureStore` seam, and a CPU store

pub mod clip;
pub mod color;
pub mod geometry;
pub mod texture;

// Re-exports for convenience
pub use clip::clip;
pub use color::{lerp, Color3, Color4, Gradient, Lerp};
pub use geometry::{Rect, Vec2};
pub use texture::{
    check_texture_size, check_texture_write, CpuTexture, CpuTextureStore, TextureError,
    TextureId, TextureIds, TextureRegion, TextureStore,
};
