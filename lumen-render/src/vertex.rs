//! GPU vertex and uniform data types for the sprite renderer.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

// ───────────────────────────────────────────────────────────────────
// Sprite vertex
// ───────────────────────────────────────────────────────────────────

/// One corner of a sprite quad.
///
/// Quads are written as four vertices in the order top-left, top-right,
/// bottom-left, bottom-right.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// Pixel position; `z` carries the sprite depth.
    pub position: [f32; 3],
    /// Corner of the quad in [0, 1] space.
    pub relative_position: [f32; 2],
    /// UV rectangle `[x, y, width, height]` of the whole sprite.
    pub uv_rect: [f32; 4],
    /// RGBA8 colour.
    pub colour: [u8; 4],
}

impl SpriteVertex {
    /// Vertices per sprite quad.
    pub const PER_QUAD: usize = 4;

    /// Indices per sprite quad (two triangles).
    pub const INDICES_PER_QUAD: usize = 6;

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(0) = position
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x3,
            },
            // location(1) = relative_position
            VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            // location(2) = uv_rect
            VertexAttribute {
                offset: 20,
                shader_location: 2,
                format: VertexFormat::Float32x4,
            },
            // location(3) = colour
            VertexAttribute {
                offset: 36,
                shader_location: 3,
                format: VertexFormat::Unorm8x4,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Index list for `quad_count` quads: `v, v+2, v+3, v+3, v+1, v` per quad.
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * SpriteVertex::INDICES_PER_QUAD);
    for quad in 0..quad_count as u32 {
        let v = quad * SpriteVertex::PER_QUAD as u32;
        // Top-left, bottom-left, bottom-right; bottom-right, top-right, top-left.
        indices.extend_from_slice(&[v, v + 2, v + 3, v + 3, v + 1, v]);
    }
    indices
}

// ───────────────────────────────────────────────────────────────────
// Camera uniform
// ───────────────────────────────────────────────────────────────────

/// Camera uniform buffer data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// 4×4 projection matrix (column-major).
    pub view_proj: [[f32; 4]; 4],
}

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl CameraUniform {
    /// Build an orthographic projection for a viewport of `width × height`
    /// pixels, with optional pan and zoom.
    ///
    /// Maps (0,0) to top-left, (width, height) to bottom-right.
    pub fn orthographic(width: f32, height: f32, pan_x: f32, pan_y: f32, zoom: f32) -> Self {
        // ndc_x = (world_x - pan_x) * (2 * zoom / width) - 1
        // ndc_y = 1 - (world_y - pan_y) * (2 * zoom / height)
        let sx = 2.0 * zoom / width;
        let sy = -2.0 * zoom / height; // flip Y for top-left origin
        let tx = -pan_x * sx - 1.0;
        let ty = -pan_y * sy + 1.0;

        Self {
            view_proj: [
                [sx,  0.0, 0.0, 0.0],
                [0.0, sy,  0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx,  ty,  0.0, 1.0],
            ],
        }
    }

    /// Screen space: 1 unit = 1 pixel, no pan, no zoom.
    pub fn screen(width: f32, height: f32) -> Self {
        Self::orthographic(width, height, 0.0, 0.0, 1.0)
    }

    /// Combine a world transform with a view projection
    /// (`view_proj × world`).
    pub fn from_world_view(world: [[f32; 4]; 4], view_proj: [[f32; 4]; 4]) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (col, out_col) in out.iter_mut().enumerate() {
            for (row, cell) in out_col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| view_proj[k][row] * world[col][k]).sum();
            }
        }
        Self { view_proj: out }
    }

    /// Transform a pixel position to normalised device coordinates.
    pub fn project(&self, x: f32, y: f32) -> [f32; 2] {
        let m = &self.view_proj;
        [
            x * m[0][0] + y * m[1][0] + m[3][0],
            x * m[0][1] + y * m[1][1] + m[3][1],
        ]
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: IDENTITY,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
