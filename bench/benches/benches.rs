use island_core::edge_mask::{material_blend, shoreline};
use island_core::{
    HeightmapGenerator, NoiseConfig, NoiseField, PrimitiveKind, TileClassifier, World,
    WorldProfile,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SIZE: usize = 256;
const SEED: u32 = 2025;

fn profile(primitive: PrimitiveKind) -> WorldProfile {
    WorldProfile {
        size: SIZE,
        noise: NoiseConfig {
            seed: SEED,
            primitive,
            ..NoiseConfig::default()
        },
        ..WorldProfile::default()
    }
}

fn bench_heightmap(c: &mut Criterion) {
    for primitive in [PrimitiveKind::Simplex, PrimitiveKind::Perlin] {
        let p = profile(primitive);
        let field = NoiseField::new(p.noise.clone());
        let generator = HeightmapGenerator::from_profile(&p);
        c.bench_function(&format!("heightmap {primitive:?} {SIZE}x{SIZE}"), |b| {
            b.iter(|| black_box(generator.generate(&field)))
        });
    }
}

fn bench_classify(c: &mut Criterion) {
    let p = profile(PrimitiveKind::Simplex);
    let height = HeightmapGenerator::from_profile(&p)
        .generate(&NoiseField::new(p.noise.clone()))
        .grid;
    let classifier = TileClassifier::new(&p.bands, p.layer_count).unwrap();
    c.bench_function("classify 3 bands", |b| {
        b.iter(|| black_box(classifier.classify(&height)))
    });
}

fn bench_edge_masks(c: &mut Criterion) {
    let p = profile(PrimitiveKind::Simplex);
    let height = HeightmapGenerator::from_profile(&p)
        .generate(&NoiseField::new(p.noise.clone()))
        .grid;
    for radius in [0, 1, 3] {
        c.bench_function(&format!("shoreline r={radius}"), |b| {
            b.iter(|| black_box(shoreline(&height, p.water_level, radius)))
        });
    }
    c.bench_function("material blend r=1", |b| {
        b.iter(|| black_box(material_blend(&height, p.blend_level, 1)))
    });
}

fn bench_full_world(c: &mut Criterion) {
    let p = profile(PrimitiveKind::Simplex);
    c.bench_function("world: all stages", |b| {
        b.iter(|| black_box(World::generate(&p).unwrap()))
    });
}

criterion_group!(
    island_benchmarks,
    bench_heightmap,
    bench_classify,
    bench_edge_masks,
    bench_full_world
);
criterion_main!(island_benchmarks);
