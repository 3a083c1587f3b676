// core holds the island pipeline: noise, heightmap, tile classification, edge masks
pub mod classify;
pub mod edge_mask;
pub mod error;
pub mod grid;
pub mod heightmap;
pub mod noise_field;
pub mod profile;
pub mod world;

pub use classify::{Classification, LayerClassification, TileClassifier};
pub use edge_mask::{BoundaryMode, EdgeMaskGenerator};
pub use error::{ConfigError, GenerationWarning};
pub use grid::{Direction, EdgeMask, Grid, HeightGrid};
pub use heightmap::{HeightOutcome, HeightmapGenerator};
pub use noise_field::{GradientNoise, NoiseField};
pub use profile::{NoiseConfig, PrimitiveKind, Stages, TileBand, WorldProfile};
pub use world::{World, WorldGenerator};

// Single-octave gradient noise sampled by `NoiseField`.
// Must be deterministic for a given seed and return values in [-1, 1].
pub trait NoisePrimitive: Send + Sync {
    fn get2(&self, x: f64, y: f64) -> f64;
}

// Plain functions and closures work as primitives, handy for fixed test fields
impl<F> NoisePrimitive for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn get2(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
