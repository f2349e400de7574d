//! In-memory backend that records everything the batcher sends it.
//!
//! [`RecordingBackend`] stands in for the GPU: textures live in a
//! [`CpuTextureStore`], uploads are kept, and draw calls are appended to a
//! command list. Used for headless tests and tooling.

use std::ops::Range;

use lumen_core::{CpuTextureStore, TextureError, TextureId, TextureRegion, TextureStore};

use crate::batcher::{DrawRecorder, SpriteBuffers};
use crate::vertex::{CameraUniform, SpriteVertex};

/// One call received through [`DrawRecorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    SetCamera(CameraUniform),
    BindTexture(TextureId),
    DrawIndexed(Range<u32>),
}

#[derive(Default)]
pub struct RecordingBackend {
    textures: CpuTextureStore,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    vertex_uploads: usize,
    index_uploads: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose textures are limited to `max_dimension`.
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            textures: CpuTextureStore::with_max_dimension(max_dimension),
            ..Self::default()
        }
    }

    pub fn textures(&self) -> &CpuTextureStore {
        &self.textures
    }

    /// Contents of the last vertex upload.
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Contents of the last index upload.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_uploads(&self) -> usize {
        self.vertex_uploads
    }

    pub fn index_uploads(&self) -> usize {
        self.index_uploads
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded draw calls.
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawIndexed(_)))
            .count()
    }

    /// Vertex indices drawn by the recorded commands, in draw order.
    pub fn drawn_indices(&self) -> Vec<u32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawIndexed(range) => {
                    self.indices.get(range.start as usize..range.end as usize)
                }
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Forget recorded draw commands, keeping textures and buffers.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl TextureStore for RecordingBackend {
    fn max_texture_dimension(&self) -> u32 {
        self.textures.max_texture_dimension()
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, TextureError> {
        self.textures.create_texture(width, height)
    }

    fn write_texture(
        &mut self,
        texture: TextureId,
        region: TextureRegion,
        rgba: &[u8],
    ) -> Result<(), TextureError> {
        self.textures.write_texture(texture, region, rgba)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.destroy_texture(texture);
    }
}

impl SpriteBuffers for RecordingBackend {
    fn upload_vertices(&mut self, vertices: &[SpriteVertex]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.vertex_uploads += 1;
    }

    fn upload_indices(&mut self, indices: &[u32]) {
        self.indices.clear();
        self.indices.extend_from_slice(indices);
        self.index_uploads += 1;
    }
}

impl DrawRecorder for RecordingBackend {
    fn set_camera(&mut self, camera: &CameraUniform) {
        self.commands.push(DrawCommand::SetCamera(*camera));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        self.commands.push(DrawCommand::DrawIndexed(indices));
    }
}

// ===================================================================
// Tests
// ===================================================================
