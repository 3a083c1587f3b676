// World profile: every knob a generation run reads, loadable from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Which gradient-noise primitive backs the noise field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    #[default]
    Simplex,
    Perlin,
}

/// Fractal noise settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Frequency of the first octave, in cycles per cell.
    pub base_roughness: f32,
    /// Frequency multiplier between octaves.
    pub roughness: f32,
    /// Amplitude multiplier between octaves.
    pub persistence: f32,
    pub num_layers: u32,
    /// Subtracted from the accumulated value before clamping at zero.
    pub min_value: f32,
    pub strength: f32,
    pub seed: u32,
    pub primitive: PrimitiveKind,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            base_roughness: 0.02,
            roughness: 2.0,
            persistence: 0.5,
            num_layers: 4,
            min_value: 0.0,
            strength: 1.0,
            seed: 0,
            primitive: PrimitiveKind::Simplex,
        }
    }
}

/// Elevation threshold that places a tile on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileBand {
    #[serde(default)]
    pub name: String,
    pub start_elevation: f32,
    /// Upper bound used for relative-elevation shading only.
    #[serde(default)]
    pub end_elevation: Option<f32>,
    pub layer: usize,
}

impl TileBand {
    pub fn new(start_elevation: f32, layer: usize) -> Self {
        Self {
            name: String::new(),
            start_elevation,
            end_elevation: None,
            layer,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_end(mut self, end_elevation: f32) -> Self {
        self.end_elevation = Some(end_elevation);
        self
    }
}

/// Optional pipeline stages. The heightmap and occupancy pass always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stages {
    /// Binary ground and water masks.
    pub water: bool,
    /// Graded shoreline mask around land touching water.
    pub shore: bool,
    /// Graded material-blend mask along the `blend_level` contour.
    pub blend: bool,
    /// Relative-elevation grids for bands with an upper bound.
    pub relative_elevation: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            water: true,
            shore: true,
            blend: true,
            relative_elevation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldProfile {
    pub size: usize,
    pub layer_count: usize,
    pub water_level: f32,
    pub fall_off_a: f32,
    pub fall_off_b: f32,
    pub noise: NoiseConfig,
    pub bands: Vec<TileBand>,
    pub stages: Stages,
    pub shore_radius: usize,
    /// Elevation above which the blended material (dirt) starts.
    pub blend_level: f32,
    pub blend_radius: usize,
}

impl Default for WorldProfile {
    fn default() -> Self {
        Self {
            size: 500,
            layer_count: 3,
            water_level: 0.1,
            fall_off_a: 1.0,
            fall_off_b: 2.0,
            noise: NoiseConfig::default(),
            bands: vec![
                TileBand::new(0.1, 0).named("sand").with_end(0.3),
                TileBand::new(0.3, 1).named("grass").with_end(0.6),
                TileBand::new(0.6, 2).named("rock").with_end(1.0),
            ],
            stages: Stages::default(),
            shore_radius: 1,
            blend_level: 0.3,
            blend_radius: 1,
        }
    }
}

impl WorldProfile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let profile: WorldProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading world profile");
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Reject anything that would make generation ill-defined, before any work starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size % 2 != 0 {
            return Err(ConfigError::InvalidSize(self.size));
        }
        if self.layer_count == 0 {
            return Err(ConfigError::NoLayers);
        }
        unit_interval("water_level", self.water_level)?;
        unit_interval("blend_level", self.blend_level)?;
        if !(self.fall_off_a.is_finite() && self.fall_off_a > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "fall_off_a",
                value: self.fall_off_a,
            });
        }
        if !(self.fall_off_b.is_finite() && self.fall_off_b >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "fall_off_b",
                value: self.fall_off_b,
            });
        }

        let noise = &self.noise;
        for (name, value) in [
            ("noise.base_roughness", noise.base_roughness),
            ("noise.roughness", noise.roughness),
            ("noise.persistence", noise.persistence),
            ("noise.min_value", noise.min_value),
            ("noise.strength", noise.strength),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        validate_bands(&self.bands, self.layer_count)?;
        for (index, pair) in self.bands.windows(2).enumerate() {
            if pair[1].start_elevation < pair[0].start_elevation {
                return Err(ConfigError::UnsortedBands {
                    index: index + 1,
                    start: pair[1].start_elevation,
                    previous: pair[0].start_elevation,
                });
            }
        }
        Ok(())
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

// Order-independent band checks, shared with the classifier
pub(crate) fn validate_bands(bands: &[TileBand], layer_count: usize) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::NoBands);
    }
    for (index, band) in bands.iter().enumerate() {
        if band.layer >= layer_count {
            return Err(ConfigError::BandLayerOutOfRange {
                index,
                layer: band.layer,
                layer_count,
            });
        }
        let start_ok = band.start_elevation.is_finite();
        let end_ok = band
            .end_elevation
            .is_none_or(|end| end.is_finite() && end > band.start_elevation);
        if !start_ok || !end_ok {
            return Err(ConfigError::InvalidBandRange {
                index,
                start: band.start_elevation,
                end: band.end_elevation,
            });
        }
    }
    Ok(())
}
