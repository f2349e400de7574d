//! Benchmarks for lumen-render sprite batching: quad building, sorting,
//! batch generation and string drawing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::{Color4, Gradient, Rect, TextureId, TextureStore, Vec2};
use lumen_render::{
    BatcherConfig, CameraUniform, QuadShape, RecordingBackend, Sprite, SpriteBatcher,
    SpriteSortMode,
};
use lumen_text::{CharRange, FontInstance, Glyph, StringComponent, TextAlign, WordWrap};

/// Generate `n` sprites spread over `textures` textures and 16 depths.
fn make_sprites(n: usize, textures: &[TextureId]) -> Vec<Sprite> {
    (0..n)
        .map(|i| {
            let fi = i as f32;
            Sprite {
                shape: QuadShape::Gradient,
                texture: Some(textures[i % textures.len()]),
                position: Vec2::new((fi * 7.3) % 1920.0, (fi * 13.7) % 1080.0),
                size: Vec2::new(50.0 + (fi * 3.1) % 200.0, 30.0 + (fi * 5.7) % 150.0),
                depth: (i % 16) as f32,
                c1: Color4::rgb((i % 255) as u8, 0, 0),
                c2: Color4::WHITE,
                gradient: Gradient::TopLeftToBottomRight,
                ..Sprite::default()
            }
        })
        .collect()
}

fn setup(texture_count: usize) -> (SpriteBatcher, RecordingBackend, Vec<TextureId>) {
    let mut backend = RecordingBackend::new();
    let batcher = SpriteBatcher::new(&mut backend, BatcherConfig::default()).unwrap();
    let textures = (0..texture_count)
        .map(|_| backend.create_texture(4, 4).unwrap())
        .collect();
    (batcher, backend, textures)
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("batcher_frame");
    for &count in &[100, 1_000, 10_000] {
        let (mut batcher, mut backend, textures) = setup(8);
        let sprites = make_sprites(count, &textures);
        for (name, mode) in [
            ("texture", SpriteSortMode::Texture),
            ("back_to_front", SpriteSortMode::BackToFront),
        ] {
            group.bench_with_input(BenchmarkId::new(name, count), &sprites, |b, sprites| {
                b.iter(|| {
                    batcher.begin();
                    for sprite in sprites {
                        batcher.draw(*sprite);
                    }
                    batcher.end(mode, &mut backend);
                    black_box(batcher.batches().len());
                });
            });
        }
    }
    group.finish();
}

fn bench_quad_build(c: &mut Criterion) {
    let sprite = make_sprites(1, &[TextureId::new(1).unwrap()])[0];
    c.bench_function("QuadShape::Gradient::build", |b| {
        b.iter(|| {
            black_box(QuadShape::Gradient.build(black_box(&sprite)));
        });
    });
}

fn bench_camera_orthographic(c: &mut Criterion) {
    c.bench_function("CameraUniform::orthographic", |b| {
        b.iter(|| {
            black_box(CameraUniform::orthographic(
                black_box(1920.0),
                black_box(1080.0),
                black_box(100.0),
                black_box(50.0),
                black_box(1.5),
            ));
        });
    });
}

fn bench_draw_string(c: &mut Criterion) {
    let (mut batcher, mut backend, textures) = setup(1);
    let range = CharRange::PRINTABLE_ASCII;
    let glyphs = range
        .chars()
        .map(|character| Glyph {
            character,
            uv_rect: Rect::UNIT,
            size: Vec2::new(8.0, 16.0),
            supported: true,
        })
        .collect();
    let font = FontInstance::from_parts(textures[0], 16, range, glyphs);
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
    let components = [StringComponent::new(&text, &font)];
    let rect = Rect::new(0.0, 0.0, 640.0, 480.0);

    c.bench_function("draw_string_greedy_900_chars", |b| {
        b.iter(|| {
            batcher.begin();
            batcher.draw_string(
                black_box(&components),
                &rect,
                WordWrap::Greedy,
                TextAlign::CenterCenter,
                0.0,
            );
            batcher.end(SpriteSortMode::Texture, &mut backend);
            black_box(batcher.sprite_count());
        });
    });
}

criterion_group!(
    benches,
    bench_frame,
    bench_quad_build,
    bench_camera_orthographic,
    bench_draw_string,
);
criterion_main!(benches);
