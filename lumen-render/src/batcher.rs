//! Sprite batcher: accumulates quads, sorts them and coalesces them into
//! per-texture draw batches.
//!
//! A frame goes through three states:
//!
//! ```text
//!  Idle ──begin──▶ Accumulating ──end──▶ Ready ──render──▶ Ready
//!   ▲                                      │
//!   └────────────────begin─────────────────┘
//! ```
//!
//! Calls made in the wrong state are ignored with a warning; debug
//! builds panic instead.
//!
//! The batcher never talks to the GPU directly. Vertex and index data go
//! out through [`SpriteBuffers`] in [`SpriteBatcher::end`], and draw calls
//! through [`DrawRecorder`] in [`SpriteBatcher::render`].

use std::ops::Range;

use lumen_core::{
    clip, Color4, Gradient, Rect, TextureError, TextureId, TextureRegion, TextureStore, Vec2,
};
use lumen_text::{layout_glyph_quads, StringComponent, TextAlign, WordWrap};

use crate::sprite::{QuadShape, Sprite, SpriteBatch, SpriteSortMode};
use crate::vertex::{quad_indices, CameraUniform, SpriteVertex};

/// Destination for the vertex and index data built by [`SpriteBatcher::end`].
pub trait SpriteBuffers {
    /// Replace the vertex buffer contents.
    fn upload_vertices(&mut self, vertices: &[SpriteVertex]);

    /// Replace the index buffer contents.
    fn upload_indices(&mut self, indices: &[u32]);
}

/// Receives the draw calls issued by [`SpriteBatcher::render`].
pub trait DrawRecorder {
    fn set_camera(&mut self, camera: &CameraUniform);

    fn bind_texture(&mut self, texture: TextureId);

    /// Draw the given range of the uploaded index buffer.
    fn draw_indexed(&mut self, indices: Range<u32>);
}

/// Statistics for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sprite_count: u32,
    pub batch_count: u32,
    pub draw_calls: u32,
}

/// Batcher settings.
#[derive(Clone, Debug)]
pub struct BatcherConfig {
    /// Sprites reserved up front.
    pub initial_capacity: usize,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BatcherState {
    Idle,
    Accumulating,
    Ready,
}

/// Collects sprites between [`begin`](Self::begin) and [`end`](Self::end)
/// and turns them into the fewest draw calls the sort mode allows.
pub struct SpriteBatcher {
    state: BatcherState,
    sprites: Vec<Sprite>,
    order: Vec<u32>,
    batches: Vec<SpriteBatch>,
    vertices: Vec<SpriteVertex>,
    /// Indices currently held by the index buffer.
    uploaded_indices: usize,
    default_texture: TextureId,
}

impl SpriteBatcher {
    /// Create a batcher and its 1×1 white texture, used for sprites
    /// without a texture.
    pub fn new(
        textures: &mut dyn TextureStore,
        config: BatcherConfig,
    ) -> Result<Self, TextureError> {
        let default_texture = textures.create_texture(1, 1)?;
        let white = TextureRegion::full(1, 1);
        if let Err(e) = textures.write_texture(default_texture, white, &[255; 4]) {
            textures.destroy_texture(default_texture);
            return Err(e);
        }

        let capacity = config.initial_capacity;
        Ok(Self {
            state: BatcherState::Idle,
            sprites: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            batches: Vec::new(),
            vertices: Vec::with_capacity(capacity * SpriteVertex::PER_QUAD),
            uploaded_indices: 0,
            default_texture,
        })
    }

    fn check_state(&self, expected: BatcherState, operation: &str) -> bool {
        if self.state == expected {
            return true;
        }
        log::warn!(
            "SpriteBatcher::{} called while {:?} (expected {:?}); ignored",
            operation,
            self.state,
            expected
        );
        debug_assert_eq!(self.state, expected, "SpriteBatcher::{operation} called out of order");
        false
    }

    // ───────────────────── Frame ──────────────────────────────────

    /// Start a new frame, discarding the previous frame's sprites.
    pub fn begin(&mut self) {
        if self.state == BatcherState::Accumulating {
            log::warn!("SpriteBatcher::begin called twice without end; ignored");
            debug_assert!(
                self.state != BatcherState::Accumulating,
                "SpriteBatcher::begin called twice without end"
            );
            return;
        }
        self.sprites.clear();
        self.batches.clear();
        self.state = BatcherState::Accumulating;
    }

    /// Sort the frame's sprites, build the batches and upload the
    /// geometry.
    ///
    /// Vertices are uploaded every frame. Indices only depend on the
    /// sprite count, so they are uploaded only when the frame needs more
    /// than the buffer already holds.
    pub fn end(&mut self, sort_mode: SpriteSortMode, buffers: &mut dyn SpriteBuffers) {
        if !self.check_state(BatcherState::Accumulating, "end") {
            return;
        }

        let Self {
            sprites,
            order,
            batches,
            vertices,
            default_texture,
            ..
        } = self;
        let default_texture = *default_texture;

        order.clear();
        order.extend(0..sprites.len() as u32);
        // Stable sorts: equal keys keep submission order.
        match sort_mode {
            SpriteSortMode::Texture => {
                order.sort_by_key(|&i| sprites[i as usize].texture.unwrap_or(default_texture));
            }
            SpriteSortMode::FrontToBack => {
                order.sort_by(|&a, &b| {
                    sprites[a as usize].depth.total_cmp(&sprites[b as usize].depth)
                });
            }
            SpriteSortMode::BackToFront => {
                order.sort_by(|&a, &b| {
                    sprites[b as usize].depth.total_cmp(&sprites[a as usize].depth)
                });
            }
        }

        batches.clear();
        vertices.clear();
        let per_quad = SpriteVertex::INDICES_PER_QUAD as u32;
        for (n, &i) in order.iter().enumerate() {
            let sprite = &sprites[i as usize];
            let texture = sprite.texture.unwrap_or(default_texture);
            vertices.extend_from_slice(&sprite.shape.build(sprite));

            match batches.last_mut() {
                Some(batch) if batch.texture == texture => batch.index_count += per_quad,
                _ => batches.push(SpriteBatch {
                    texture,
                    index_offset: n as u32 * per_quad,
                    index_count: per_quad,
                }),
            }
        }

        let index_count = sprites.len() * SpriteVertex::INDICES_PER_QUAD;
        if index_count > self.uploaded_indices {
            buffers.upload_indices(&quad_indices(self.sprites.len()));
            self.uploaded_indices = index_count;
        }
        buffers.upload_vertices(&self.vertices);

        log::debug!(
            "Sprite frame: {} sprites in {} batches ({:?})",
            self.sprites.len(),
            self.batches.len(),
            sort_mode
        );
        self.state = BatcherState::Ready;
    }

    /// Issue one draw call per batch. May be repeated until the next
    /// [`begin`](Self::begin).
    pub fn render(&self, camera: &CameraUniform, recorder: &mut dyn DrawRecorder) -> FrameStats {
        if !self.check_state(BatcherState::Ready, "render") {
            return FrameStats::default();
        }

        recorder.set_camera(camera);
        for batch in &self.batches {
            recorder.bind_texture(batch.texture);
            recorder.draw_indexed(batch.index_offset..batch.index_offset + batch.index_count);
        }

        FrameStats {
            sprite_count: self.sprites.len() as u32,
            batch_count: self.batches.len() as u32,
            draw_calls: self.batches.len() as u32,
        }
    }

    // ───────────────────── Drawing ────────────────────────────────

    pub fn draw(&mut self, sprite: Sprite) {
        if !self.check_state(BatcherState::Accumulating, "draw") {
            return;
        }
        self.sprites.push(sprite);
    }

    /// Draw `sprite` with a different quad shape.
    pub fn draw_shape(&mut self, shape: QuadShape, sprite: Sprite) {
        self.draw(Sprite { shape, ..sprite });
    }

    /// Draw an untinted textured quad. `None` draws a white rectangle.
    pub fn draw_textured(
        &mut self,
        texture: Option<TextureId>,
        position: Vec2,
        size: Vec2,
        depth: f32,
        uv_rect: Rect,
    ) {
        self.draw(Sprite {
            shape: QuadShape::Plain,
            texture,
            position,
            size,
            depth,
            uv_rect,
            c1: Color4::WHITE,
            c2: Color4::WHITE,
            gradient: Gradient::None,
        });
    }

    /// Draw a quad coloured by `gradient` from `c1` to `c2`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_coloured(
        &mut self,
        texture: Option<TextureId>,
        position: Vec2,
        size: Vec2,
        c1: Color4,
        c2: Color4,
        gradient: Gradient,
        depth: f32,
        uv_rect: Rect,
    ) {
        self.draw(Sprite {
            shape: QuadShape::Gradient,
            texture,
            position,
            size,
            depth,
            uv_rect,
            c1,
            c2,
            gradient,
        });
    }

    /// Clip `sprite` against `clip_rect` and draw what remains.
    ///
    /// Empty and fully clipped sprites are skipped.
    pub fn draw_clipped(&mut self, sprite: Sprite, clip_rect: &Rect) {
        if sprite.size.x <= 0.0 || sprite.size.y <= 0.0 {
            return;
        }
        let mut sprite = sprite;
        clip(clip_rect, &mut sprite.position, &mut sprite.size, &mut sprite.uv_rect);
        if sprite.size.x <= 0.0 || sprite.size.y <= 0.0 {
            return;
        }
        self.draw(sprite);
    }

    /// Lay out `components` inside `rect` and draw one glyph quad per
    /// visible character.
    pub fn draw_string(
        &mut self,
        components: &[StringComponent<'_>],
        rect: &Rect,
        wrap: WordWrap,
        align: TextAlign,
        depth: f32,
    ) {
        if !self.check_state(BatcherState::Accumulating, "draw_string") {
            return;
        }
        for quad in layout_glyph_quads(components, rect, wrap, align) {
            self.sprites.push(Sprite {
                shape: QuadShape::Glyph,
                texture: quad.texture,
                position: quad.position,
                size: quad.size,
                depth,
                uv_rect: quad.uv_rect,
                c1: quad.tint,
                c2: Color4::WHITE,
                gradient: Gradient::None,
            });
        }
    }

    // ───────────────────── Accessors ──────────────────────────────

    /// Reserve room for `count` more sprites.
    pub fn reserve(&mut self, count: usize) {
        self.sprites.reserve(count);
        self.order.reserve(count);
        self.vertices.reserve(count * SpriteVertex::PER_QUAD);
    }

    /// Sprites drawn since the last [`begin`](Self::begin).
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Batches built by the last [`end`](Self::end).
    pub fn batches(&self) -> &[SpriteBatch] {
        &self.batches
    }

    /// Vertices built by the last [`end`](Self::end), in sorted order.
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// The 1×1 white texture used for untextured sprites.
    pub fn default_texture(&self) -> TextureId {
        self.default_texture
    }

    /// Release the default texture.
    pub fn dispose(self, textures: &mut dyn TextureStore) {
        textures.destroy_texture(self.default_texture);
    }
}

// ===================================================================
// Tests
// ===================================================================
