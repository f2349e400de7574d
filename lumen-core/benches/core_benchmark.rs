//! Benchmarks for the clipper and gradient mixer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen_core::{clip, lerp, Color4, Rect, Vec2};

fn bench_clip_inside(c: &mut Criterion) {
    let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    c.bench_function("clip_inside", |b| {
        b.iter(|| {
            let mut pos = Vec2::new(100.0, 100.0);
            let mut size = Vec2::new(32.0, 32.0);
            let mut uv = Rect::UNIT;
            black_box(clip(black_box(&bounds), &mut pos, &mut size, &mut uv));
        });
    });
}

fn bench_clip_all_sides(c: &mut Criterion) {
    let bounds = Rect::new(10.0, 10.0, 100.0, 100.0);
    c.bench_function("clip_all_sides", |b| {
        b.iter(|| {
            let mut pos = Vec2::new(0.0, 0.0);
            let mut size = Vec2::new(200.0, 200.0);
            let mut uv = Rect::UNIT;
            black_box(clip(black_box(&bounds), &mut pos, &mut size, &mut uv));
        });
    });
}

fn bench_lerp(c: &mut Criterion) {
    let a = Color4::new(255, 0, 0, 255);
    let z = Color4::new(0, 0, 255, 128);
    c.bench_function("lerp_color4", |b| {
        b.iter(|| black_box(lerp(black_box(a), black_box(z), black_box(0.5))));
    });
}

criterion_group!(benches, bench_clip_inside, bench_clip_all_sides, bench_lerp);
criterion_main!(benches);
