use thiserror::Error;

/// Rejected world profile. Raised before any grid is produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("world size must be even and greater than zero, got {0}")]
    InvalidSize(usize),

    #[error("layer count must be greater than zero")]
    NoLayers,

    #[error("at least one tile band is required")]
    NoBands,

    #[error("tile bands must be sorted by start elevation (band {index} starts at {start} after {previous})")]
    UnsortedBands {
        index: usize,
        start: f32,
        previous: f32,
    },

    #[error("band {index} targets layer {layer} but only {layer_count} layers exist")]
    BandLayerOutOfRange {
        index: usize,
        layer: usize,
        layer_count: usize,
    },

    #[error("band {index} has an invalid elevation range [{start}, {end:?}]")]
    InvalidBandRange {
        index: usize,
        start: f32,
        end: Option<f32>,
    },

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal conditions met during generation. The run still completes with a
/// defined result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationWarning {
    // Every noise sample was equal; the heightmap fell back to all zeros.
    #[error("flat noise field (every sample = {value}), heightmap set to zero")]
    DegenerateInput { value: f32 },
}
