use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use tilefit::buffer::AttributeBuffers;
use tilefit::primitive::cube::Cube;
use tilefit::texture::{Rotation, TileOptions};
use tilefit::track;

const FRAMES: usize = 64;

fn cube() -> AttributeBuffers {
    Cube::with_size(1.0, 2.0, 3.0).to_buffers()
}

fn refit(mut buffers: AttributeBuffers) {
    let options = TileOptions::default()
        .with_tile(0.5, 0.5)
        .with_rotation(Rotation::Quarter);
    // Refit across a range of scalings, as when a mesh is resized over many
    // frames.
    for frame in 0..FRAMES {
        let t = frame as f32 / FRAMES as f32;
        buffers.set_scaling(Vector3::new(1.0 + t, 1.0, 1.0 + (2.0 * t)));
        track::refit(&mut buffers, &options);
    }
}

fn benchmark(criterion: &mut Criterion) {
    criterion.bench_function("refit", move |bencher| {
        bencher.iter_batched(cube, refit, BatchSize::SmallInput)
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
