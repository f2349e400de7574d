//! Sprites, quad shapes and batches.

use lumen_core::{lerp, Color4, Gradient, Rect, TextureId, Vec2};

use crate::vertex::SpriteVertex;

/// How a sprite's four vertices are built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuadShape {
    /// Colour 1 on every corner; the gradient mode is ignored.
    #[default]
    Plain,
    /// Corners coloured by the sprite's gradient mode.
    Gradient,
    /// Gradient colouring with the position snapped to whole pixels, so
    /// atlas texels map one-to-one onto the screen.
    Glyph,
}

/// One quad draw request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub shape: QuadShape,
    /// `None` draws with the batcher's 1×1 white texture.
    pub texture: Option<TextureId>,
    pub position: Vec2,
    pub size: Vec2,
    pub depth: f32,
    pub uv_rect: Rect,
    pub c1: Color4,
    pub c2: Color4,
    pub gradient: Gradient,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            shape: QuadShape::Plain,
            texture: None,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            depth: 0.0,
            uv_rect: Rect::UNIT,
            c1: Color4::WHITE,
            c2: Color4::WHITE,
            gradient: Gradient::None,
        }
    }
}

/// Corner colours in vertex order (top-left, top-right, bottom-left,
/// bottom-right).
fn gradient_colours(c1: Color4, c2: Color4, gradient: Gradient) -> [Color4; 4] {
    match gradient {
        Gradient::None => [c1; 4],
        Gradient::LeftToRight => [c1, c2, c1, c2],
        Gradient::TopToBottom => [c1, c1, c2, c2],
        Gradient::TopLeftToBottomRight => {
            let mid = lerp(c1, c2, 0.5);
            [c1, mid, mid, c2]
        }
        Gradient::TopRightToBottomLeft => {
            let mid = lerp(c1, c2, 0.5);
            [mid, c1, c2, mid]
        }
    }
}

const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

impl QuadShape {
    /// The four vertices of `sprite`.
    pub fn build(self, sprite: &Sprite) -> [SpriteVertex; 4] {
        let (position, colours) = match self {
            QuadShape::Plain => (sprite.position, [sprite.c1; 4]),
            QuadShape::Gradient => (
                sprite.position,
                gradient_colours(sprite.c1, sprite.c2, sprite.gradient),
            ),
            QuadShape::Glyph => (
                Vec2::new(sprite.position.x.round(), sprite.position.y.round()),
                gradient_colours(sprite.c1, sprite.c2, sprite.gradient),
            ),
        };

        let uv_rect = sprite.uv_rect.to_array();
        let mut vertices = [SpriteVertex::default(); 4];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let [rx, ry] = CORNERS[i];
            *vertex = SpriteVertex {
                position: [
                    position.x + sprite.size.x * rx,
                    position.y + sprite.size.y * ry,
                    sprite.depth,
                ],
                relative_position: CORNERS[i],
                uv_rect,
                colour: colours[i].to_array(),
            };
        }
        vertices
    }
}

/// Order in which sprites are laid into the vertex buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpriteSortMode {
    /// Ascending texture handle: fewest batches.
    #[default]
    Texture,
    /// Ascending depth.
    FrontToBack,
    /// Descending depth.
    BackToFront,
}

/// A run of sorted sprites sharing one texture, drawn with one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteBatch {
    pub texture: TextureId,
    pub index_offset: u32,
    pub index_count: u32,
}

// ===================================================================
// Tests
// ===================================================================
