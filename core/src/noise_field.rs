use noise::{NoiseFn, Perlin, Simplex};

use crate::NoisePrimitive;
use crate::profile::{NoiseConfig, PrimitiveKind};

// Single-octave gradient noise from the `noise` crate, seeded once
#[derive(Clone)]
pub enum GradientNoise {
    Simplex(Simplex),
    Perlin(Perlin),
}

impl GradientNoise {
    pub fn new(kind: PrimitiveKind, seed: u32) -> Self {
        match kind {
            PrimitiveKind::Simplex => GradientNoise::Simplex(Simplex::new(seed)),
            PrimitiveKind::Perlin => GradientNoise::Perlin(Perlin::new(seed)),
        }
    }
}

impl NoisePrimitive for GradientNoise {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let v = match self {
            GradientNoise::Simplex(n) => n.get([x, y]),
            GradientNoise::Perlin(n) => n.get([x, y]),
        };
        // Both implementations can overshoot slightly
        v.clamp(-1.0, 1.0)
    }
}

// Multi-octave (fractal) scalar noise over cell coordinates
pub struct NoiseField<P = GradientNoise> {
    config: NoiseConfig,
    primitive: P,
}

impl NoiseField<GradientNoise> {
    pub fn new(config: NoiseConfig) -> Self {
        let primitive = GradientNoise::new(config.primitive, config.seed);
        Self { config, primitive }
    }
}

impl<P: NoisePrimitive> NoiseField<P> {
    // Use a caller-supplied primitive instead of the configured one
    pub fn with_primitive(config: NoiseConfig, primitive: P) -> Self {
        Self { config, primitive }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    // Sum `num_layers` octaves of remapped noise, then shift, clamp and scale
    pub fn evaluate(&self, point: (f32, f32)) -> f32 {
        let cfg = &self.config;
        let (px, py) = (point.0 as f64, point.1 as f64);

        let mut value = 0.0f64;
        let mut frequency = cfg.base_roughness as f64;
        let mut amplitude = 1.0f64;

        for _ in 0..cfg.num_layers {
            let n = self.primitive.get2(px * frequency, py * frequency);
            value += (n + 1.0) * 0.5 * amplitude;
            frequency *= cfg.roughness as f64;
            amplitude *= cfg.persistence as f64;
        }

        let value = (value as f32 - cfg.min_value).max(0.0);
        value * cfg.strength
    }
}
