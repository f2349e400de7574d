//! Sprite render pipeline: indexed, vertex-coloured textured quads.
//!
//! Group 0 holds the camera uniform, group 1 the bound sprite texture and
//! its sampler. Each texture gets its own group-1 bind group, created by
//! [`SpritePipeline::create_texture_bind_group`].

use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites,
    Device, FilterMode, FragmentState, FrontFace, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, Queue,
    RenderPipeline, RenderPipelineDescriptor, Sampler, SamplerBindingType, SamplerDescriptor,
    ShaderModuleDescriptor, ShaderStages, TextureFormat, TextureSampleType, TextureView,
    TextureViewDimension, VertexState,
};

use crate::shader::{ShaderError, ShaderProgram, ShaderStage};
use crate::vertex::{CameraUniform, SpriteVertex};

/// WGSL source of the bundled sprite shader (both stages).
pub const SPRITE_SHADER_SOURCE: &str = include_str!("../shaders/sprite.wgsl");

/// Linked program built from [`SPRITE_SHADER_SOURCE`].
pub fn default_sprite_program() -> Result<ShaderProgram, ShaderError> {
    let mut program = ShaderProgram::new();
    program.add_shader(ShaderStage::Vertex, SPRITE_SHADER_SOURCE)?;
    program.add_shader(ShaderStage::Fragment, SPRITE_SHADER_SOURCE)?;
    program.link()?;
    Ok(program)
}

/// Owns the wgpu pipeline, camera uniform and sampler for sprites.
pub struct SpritePipeline {
    pipeline: RenderPipeline,

    // Camera.
    camera_buffer: Buffer,
    camera_bind_group: BindGroup,

    // Textures.
    texture_bgl: BindGroupLayout,
    sampler: Sampler,
}

impl SpritePipeline {
    /// Build the pipeline from a linked `program`.
    pub fn new(
        device: &Device,
        surface_format: TextureFormat,
        program: &ShaderProgram,
        filter_mode: FilterMode,
    ) -> Result<Self, ShaderError> {
        if !program.is_linked() {
            return Err(ShaderError::Link("program is not linked".to_string()));
        }
        let (Some(vertex_source), Some(fragment_source)) = (
            program.source(ShaderStage::Vertex),
            program.source(ShaderStage::Fragment),
        ) else {
            return Err(ShaderError::Link("program has no sources".to_string()));
        };

        // ── Shaders ─────────────────────────────────────────────
        let vertex_module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sprite_vs"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment_module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sprite_fs"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        // ── Camera bind group layout (group 0) ──────────────────
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sprite_camera_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Texture bind group layout (group 1) ─────────────────
        let texture_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sprite_texture_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&camera_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &vertex_module,
                entry_point: Some(program.entry_point(ShaderStage::Vertex)),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(FragmentState {
                module: &fragment_module,
                entry_point: Some(program.entry_point(ShaderStage::Fragment)),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Camera uniform buffer ───────────────────────────────
        let camera_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("sprite_camera_ub"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite_camera_bg"),
            layout: &camera_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            ..Default::default()
        });

        Ok(Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bgl,
            sampler,
        })
    }

    /// Group-1 bind group for one sprite texture.
    pub fn create_texture_bind_group(&self, device: &Device, view: &TextureView) -> BindGroup {
        device.create_bind_group(&BindGroupDescriptor {
            label: Some("sprite_texture_bg"),
            layout: &self.texture_bgl,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Upload the camera uniform for the next submission.
    pub fn upload_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn camera_bind_group(&self) -> &BindGroup {
        &self.camera_bind_group
    }
}

// ===================================================================
// Tests
// ===================================================================
