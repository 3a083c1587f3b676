use rayon::prelude::*;
use tracing::{debug, warn};

use crate::NoisePrimitive;
use crate::error::GenerationWarning;
use crate::grid::{Grid, HeightGrid};
use crate::noise_field::NoiseField;
use crate::profile::WorldProfile;

/// Heightmap plus anything worth reporting about how it was produced.
#[derive(Debug, Clone)]
pub struct HeightOutcome {
    pub grid: HeightGrid,
    pub warning: Option<GenerationWarning>,
}

/// Builds a normalized, island-shaped elevation grid from noise samples.
///
/// Two passes over the grid: raw sampling with a global min/max reduction,
/// then normalization, square island falloff and the contrast curve.
/// Rows are processed in parallel; each cell only depends on its own sample
/// and the reduced range, so the output does not depend on scheduling.
#[derive(Debug, Clone, Copy)]
pub struct HeightmapGenerator {
    size: usize,
    fall_off_a: f32,
    fall_off_b: f32,
}

impl HeightmapGenerator {
    pub fn new(size: usize, fall_off_a: f32, fall_off_b: f32) -> Self {
        Self {
            size,
            fall_off_a,
            fall_off_b,
        }
    }

    pub fn from_profile(profile: &WorldProfile) -> Self {
        Self::new(profile.size, profile.fall_off_a, profile.fall_off_b)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generate<P: NoisePrimitive>(&self, field: &NoiseField<P>) -> HeightOutcome {
        let raw = self.sample(field);
        self.shape(raw)
    }

    // Pass 1: raw noise value per cell
    pub fn sample<P: NoisePrimitive>(&self, field: &NoiseField<P>) -> Grid<f32> {
        let size = self.size;
        let mut raw = Grid::filled(size, 0.0f32);
        raw.as_mut_slice()
            .par_chunks_mut(size.max(1))
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = field.evaluate((x as f32, y as f32));
                }
            });
        raw
    }

    // Pass 2: normalize against the global range, then shape into an island
    pub fn shape(&self, mut raw: Grid<f32>) -> HeightOutcome {
        let size = raw.size();
        let (min, max) = raw
            .as_slice()
            .par_iter()
            .fold(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            )
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |a, b| (a.0.min(b.0), a.1.max(b.1)),
            );
        debug!(size, min, max, "sampled raw elevation");

        let range = max - min;
        let flat = range.is_nan() || range <= 0.0;
        let warning = if flat && size > 0 {
            let w = GenerationWarning::DegenerateInput { value: min };
            warn!("{w}");
            Some(w)
        } else {
            None
        };

        let (a, b) = (self.fall_off_a, self.fall_off_b);
        raw.as_mut_slice()
            .par_chunks_mut(size.max(1))
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    let mut e = if flat { 0.0 } else { (*v - min) / range };
                    e *= 1.0 - island_falloff(x, y, size);
                    *v = contrast_curve(e, a, b);
                }
            });

        HeightOutcome {
            grid: raw,
            warning,
        }
    }
}

// Chebyshev distance from the grid center, 0 at the center and 1 at the edge
#[inline]
pub fn island_falloff(x: usize, y: usize, size: usize) -> f32 {
    let half = size as f32 / 2.0;
    let fx = (x as f32 / half - 1.0).abs();
    let fy = (y as f32 / half - 1.0).abs();
    fx.max(fy)
}

// e^a / (e^a + (b - b*e)^a), with 0^a = 0 and a vanishing denominator mapped to 0
#[inline]
pub fn contrast_curve(e: f32, a: f32, b: f32) -> f32 {
    let num = e.powf(a);
    let den = num + (b - b * e).powf(a);
    if den.is_nan() || den <= 0.0 || den.is_infinite() {
        return 0.0;
    }
    (num / den).clamp(0.0, 1.0)
}
