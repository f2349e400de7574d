//! wgpu sprite renderer: the GPU side of the [`SpriteBatcher`].
//!
//! [`SpriteRenderer`] owns the sprite pipeline, growable vertex and index
//! buffers and a texture table. It is the [`TextureStore`] fonts and the
//! batcher allocate from, the [`SpriteBuffers`] target of
//! [`SpriteBatcher::end`], and it replays a finished frame into a render
//! pass through a [`DrawRecorder`].

use std::ops::Range;

use lumen_core::{
    check_texture_size, check_texture_write, TextureError, TextureId, TextureIds, TextureRegion,
    TextureStore,
};
use rustc_hash::FxHashMap;
use thiserror::Error;
use wgpu::{
    BindGroup, Buffer, BufferDescriptor, BufferUsages, Color, CommandEncoderDescriptor, Extent3d,
    FilterMode, IndexFormat, LoadOp, Operations, Queue, RenderPass, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureViewDescriptor,
};

use crate::batcher::{DrawRecorder, FrameStats, SpriteBatcher, SpriteBuffers};
use crate::context::GpuContext;
use crate::pipelines::sprite::{default_sprite_program, SpritePipeline};
use crate::shader::{ShaderError, ShaderProgram};
use crate::vertex::{CameraUniform, SpriteVertex};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface configured (headless mode)")]
    NoSurface,
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),
}

/// Renderer settings.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    pub clear_color: Color,
    /// Sprites the vertex and index buffers hold before growing.
    pub initial_sprite_capacity: usize,
    /// Sampler filtering for sprite textures.
    pub filter_mode: FilterMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Color {
                r: 0.12,
                g: 0.12,
                b: 0.13,
                a: 1.0,
            },
            initial_sprite_capacity: 1024,
            filter_mode: FilterMode::Linear,
        }
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: BindGroup,
    width: u32,
    height: u32,
}

/// A GPU buffer that is recreated at the next power of two when an
/// upload does not fit.
struct GrowableBuffer {
    label: &'static str,
    usage: BufferUsages,
    buffer: Buffer,
    capacity: u64,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: BufferUsages, capacity: u64) -> Self {
        let capacity = capacity.max(wgpu::COPY_BUFFER_ALIGNMENT);
        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            label,
            usage,
            buffer,
            capacity,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            *self = Self::new(device, self.label, self.usage, needed.next_power_of_two());
            log::debug!("Grew {} to {} bytes", self.label, self.capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// Draws [`SpriteBatcher`] frames with wgpu.
///
/// Borrows the [`GpuContext`]; every texture it created is released when
/// it is dropped.
///
/// # Usage
///
/// ```ignore
/// let mut renderer = SpriteRenderer::with_default_shader(&gpu, RendererConfig::default())?;
/// let mut batcher = SpriteBatcher::new(&mut renderer, BatcherConfig::default())?;
/// batcher.begin();
/// batcher.draw_textured(None, Vec2::ZERO, Vec2::new(64.0, 64.0), 0.0, Rect::UNIT);
/// batcher.end(SpriteSortMode::Texture, &mut renderer);
/// let stats = renderer.render_to_surface(&batcher, &CameraUniform::screen(800.0, 600.0))?;
/// ```
pub struct SpriteRenderer<'g> {
    gpu: &'g GpuContext,
    pipeline: SpritePipeline,
    vertices: GrowableBuffer,
    indices: GrowableBuffer,
    textures: FxHashMap<TextureId, GpuTexture>,
    texture_ids: TextureIds,
    clear_color: Color,
}

impl<'g> SpriteRenderer<'g> {
    /// Create a renderer whose pipeline is built from `program`, which
    /// must already be linked.
    pub fn new(
        gpu: &'g GpuContext,
        program: &ShaderProgram,
        config: RendererConfig,
    ) -> Result<Self, RenderError> {
        let pipeline =
            SpritePipeline::new(&gpu.device, gpu.surface_format, program, config.filter_mode)?;

        let quads = config.initial_sprite_capacity as u64;
        let vertex_size = std::mem::size_of::<SpriteVertex>();
        let vertex_bytes = quads * (SpriteVertex::PER_QUAD * vertex_size) as u64;
        let index_bytes =
            quads * (SpriteVertex::INDICES_PER_QUAD * std::mem::size_of::<u32>()) as u64;

        let device = &gpu.device;
        let vertices = GrowableBuffer::new(device, "sprite_vb", BufferUsages::VERTEX, vertex_bytes);
        let indices = GrowableBuffer::new(device, "sprite_ib", BufferUsages::INDEX, index_bytes);

        log::info!(
            "Sprite renderer ready ({:?}, {} sprites preallocated)",
            gpu.surface_format,
            config.initial_sprite_capacity
        );

        Ok(Self {
            gpu,
            pipeline,
            vertices,
            indices,
            textures: FxHashMap::default(),
            texture_ids: TextureIds::new(),
            clear_color: config.clear_color,
        })
    }

    /// Create a renderer with the bundled sprite shader.
    pub fn with_default_shader(
        gpu: &'g GpuContext,
        config: RendererConfig,
    ) -> Result<Self, RenderError> {
        let program = default_sprite_program()?;
        Self::new(gpu, &program, config)
    }

    /// Set the background clear color.
    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| (t.width, t.height))
    }

    /// Render the batcher's last frame to the window surface.
    pub fn render_to_surface(
        &self,
        batcher: &SpriteBatcher,
        camera: &CameraUniform,
    ) -> Result<FrameStats, RenderError> {
        let surface = self.gpu.surface().ok_or(RenderError::NoSurface)?;
        let output = surface.acquire(&self.gpu.device)?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let stats = self.render_to_view(batcher, camera, &view);
        output.present();
        Ok(stats)
    }

    /// Render the batcher's last frame to an arbitrary view (headless mode).
    pub fn render_to_view(
        &self,
        batcher: &SpriteBatcher,
        camera: &CameraUniform,
        target_view: &wgpu::TextureView,
    ) -> FrameStats {
        let mut encoder = self.gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("lumen_frame_encoder"),
        });

        let stats = {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("lumen_sprite_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(self.pipeline.pipeline());
            pass.set_vertex_buffer(0, self.vertices.buffer.slice(..));
            pass.set_index_buffer(self.indices.buffer.slice(..), IndexFormat::Uint32);

            let mut recorder = PassRecorder {
                pass: &mut pass,
                queue: &self.gpu.queue,
                pipeline: &self.pipeline,
                textures: &self.textures,
                texture_bound: false,
            };
            batcher.render(camera, &mut recorder)
        };

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        stats
    }
}

impl TextureStore for SpriteRenderer<'_> {
    fn max_texture_dimension(&self) -> u32 {
        self.gpu.max_texture_dimension()
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId, TextureError> {
        let max = self.max_texture_dimension();
        check_texture_size(width, height, max)?;
        let id = self.texture_ids.allocate()?;

        let texture = self.gpu.device.create_texture(&TextureDescriptor {
            label: Some("sprite_texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        let bind_group = self.pipeline.create_texture_bind_group(&self.gpu.device, &view);

        self.textures.insert(
            id,
            GpuTexture {
                texture,
                bind_group,
                width,
                height,
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
        let target = self.textures.get(&texture).ok_or(TextureError::Unknown(texture))?;
        check_texture_write(region, target.width, target.height, rgba.len())?;
        if region.width == 0 || region.height == 0 {
            return Ok(());
        }

        let len = region.width as usize * region.height as usize * 4;
        self.gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.x,
                    y: region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            &rgba[..len],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(region.width * 4), // RGBA = 4 bytes per pixel
                rows_per_image: Some(region.height),
            },
            Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(gpu_texture) = self.textures.remove(&texture) {
            gpu_texture.texture.destroy();
        }
    }
}

impl SpriteBuffers for SpriteRenderer<'_> {
    fn upload_vertices(&mut self, vertices: &[SpriteVertex]) {
        self.vertices
            .upload(&self.gpu.device, &self.gpu.queue, bytemuck::cast_slice(vertices));
    }

    fn upload_indices(&mut self, indices: &[u32]) {
        self.indices
            .upload(&self.gpu.device, &self.gpu.queue, bytemuck::cast_slice(indices));
    }
}

impl Drop for SpriteRenderer<'_> {
    fn drop(&mut self) {
        for (_, gpu_texture) in self.textures.drain() {
            gpu_texture.texture.destroy();
        }
    }
}

/// [`DrawRecorder`] that encodes into a wgpu render pass.
struct PassRecorder<'a, 'p> {
    pass: &'a mut RenderPass<'p>,
    queue: &'a Queue,
    pipeline: &'a SpritePipeline,
    textures: &'a FxHashMap<TextureId, GpuTexture>,
    texture_bound: bool,
}

impl DrawRecorder for PassRecorder<'_, '_> {
    fn set_camera(&mut self, camera: &CameraUniform) {
        self.pipeline.upload_camera(self.queue, camera);
        self.pass.set_bind_group(0, self.pipeline.camera_bind_group(), &[]);
    }

    fn bind_texture(&mut self, texture: TextureId) {
        match self.textures.get(&texture) {
            Some(gpu_texture) => {
                self.pass.set_bind_group(1, &gpu_texture.bind_group, &[]);
                self.texture_bound = true;
            }
            None => {
                log::warn!("Unknown texture {:?}; batch skipped", texture);
                self.texture_bound = false;
            }
        }
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        if self.texture_bound {
            self.pass.draw_indexed(indices, 0, 0..1);
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
