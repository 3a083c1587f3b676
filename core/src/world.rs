use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, info_span};

use crate::classify::{Classification, TileClassifier};
use crate::edge_mask::{ground_mask, material_blend, shoreline, water_mask};
use crate::error::{ConfigError, GenerationWarning};
use crate::grid::{EdgeMask, HeightGrid};
use crate::heightmap::HeightmapGenerator;
use crate::noise_field::NoiseField;
use crate::profile::WorldProfile;

pub const SHORE_MASK: &str = "shore";
pub const BLEND_MASK: &str = "blend";
pub const GROUND_MASK: &str = "ground";
pub const WATER_MASK: &str = "water";

/// Everything one generation run produces. A new run builds a new `World`;
/// nothing is updated in place.
#[derive(Debug, Clone)]
pub struct World {
    profile: WorldProfile,
    height: HeightGrid,
    classification: Classification,
    masks: BTreeMap<String, EdgeMask>,
    warnings: Vec<GenerationWarning>,
}

impl World {
    // Validate then run the full pipeline
    pub fn generate(profile: &WorldProfile) -> Result<World, ConfigError> {
        Ok(WorldGenerator::new(profile.clone())?.generate())
    }

    pub fn size(&self) -> usize {
        self.height.size()
    }

    pub fn profile(&self) -> &WorldProfile {
        &self.profile
    }

    pub fn height(&self) -> &HeightGrid {
        &self.height
    }

    pub fn elevation(&self, x: usize, y: usize) -> f32 {
        *self.height.get(x, y)
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn mask(&self, name: &str) -> Option<&EdgeMask> {
        self.masks.get(name)
    }

    pub fn masks(&self) -> impl Iterator<Item = (&str, &EdgeMask)> + '_ {
        self.masks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }
}

/// Validated profile plus the collaborators built from it.
pub struct WorldGenerator {
    profile: WorldProfile,
    noise: NoiseField,
    classifier: TileClassifier,
}

impl WorldGenerator {
    pub fn new(profile: WorldProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        let classifier = TileClassifier::new(&profile.bands, profile.layer_count)?;
        let noise = NoiseField::new(profile.noise.clone());
        Ok(Self {
            profile,
            noise,
            classifier,
        })
    }

    pub fn profile(&self) -> &WorldProfile {
        &self.profile
    }

    pub fn generate(&self) -> World {
        let profile = &self.profile;
        let span = info_span!("generate_world", size = profile.size, seed = profile.noise.seed);
        let _guard = span.enter();
        let start = Instant::now();

        let outcome = timed("heightmap", || {
            HeightmapGenerator::from_profile(profile).generate(&self.noise)
        });
        let height = outcome.grid;
        let warnings: Vec<GenerationWarning> = outcome.warning.into_iter().collect();

        let classification = timed("classify", || {
            self.classifier
                .classify_with(&height, profile.stages.relative_elevation)
        });

        let mut masks = BTreeMap::new();
        if profile.stages.water {
            let (ground, water) = timed("water", || {
                (
                    ground_mask(&height, profile.water_level),
                    water_mask(&height, profile.water_level),
                )
            });
            masks.insert(GROUND_MASK.to_string(), ground);
            masks.insert(WATER_MASK.to_string(), water);
        }
        if profile.stages.shore {
            let shore = timed("shore", || {
                shoreline(&height, profile.water_level, profile.shore_radius)
            });
            masks.insert(SHORE_MASK.to_string(), shore);
        }
        if profile.stages.blend {
            let blend = timed("blend", || {
                material_blend(&height, profile.blend_level, profile.blend_radius)
            });
            masks.insert(BLEND_MASK.to_string(), blend);
        }

        info!(
            masks = masks.len(),
            warnings = warnings.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "world generated"
        );

        World {
            profile: profile.clone(),
            height,
            classification,
            masks,
            warnings,
        }
    }
}

fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    debug!(
        stage,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "stage done"
    );
    out
}
