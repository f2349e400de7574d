//! # lumen-render
//!
//! Sprite batching and GPU rendering for Lumen, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//!  draw / draw_coloured / draw_string   ◀─── caller, between begin and end
//!       │
//!       ▼
//!  SpriteBatcher (sprite list)          ◀─── text layout + clipping (lumen-text)
//!       │
//!       ▼
//!  SpriteBatcher.end(sort, buffers)     ◀─── sort, batch, upload via SpriteBuffers
//!       │
//!       ▼
//!  SpriteBatcher.render(cam, recorder)  ◀─── one draw call per batch via DrawRecorder
//! ```
//!
//! `SpriteRenderer` implements both seams on wgpu; `RecordingBackend`
//! implements them in memory.
//!
//! ## Crate modules
//!
//! - [`context`] — GPU device/queue/surface initialisation
//! - [`vertex`] — sprite vertex, quad indices and camera projection
//! - [`sprite`] — sprites, quad shapes, sort modes and batches
//! - [`batcher`] — the frame state machine and the backend seams
//! - [`shader`] — WGSL shader program (compile + link)
//! - [`pipelines`] — wgpu render pipelines
//! - [`renderer`] — wgpu sprite renderer
//! - [`recording`] — in-memory recording backend

pub mod batcher;
pub mod context;
pub mod pipelines;
pub mod recording;
pub mod renderer;
pub mod shader;
pub mod sprite;
pub mod vertex;

// Re-exports for convenience
pub use batcher::{BatcherConfig, DrawRecorder, FrameStats, SpriteBatcher, SpriteBuffers};
pub use context::{GpuContext, GpuError, RenderSurface};
pub use pipelines::sprite::{default_sprite_program, SpritePipeline, SPRITE_SHADER_SOURCE};
pub use recording::{DrawCommand, RecordingBackend};
pub use renderer::{RenderError, RendererConfig, SpriteRenderer};
pub use shader::{ShaderError, ShaderProgram, ShaderStage};
pub use sprite::{QuadShape, Sprite, SpriteBatch, SpriteSortMode};
pub use vertex::{quad_indices, CameraUniform, SpriteVertex};
