// Elevation banding into stacked tile layers.
// Bands are walked in ascending start order; a band whose threshold is met
// replaces any earlier band on its layer, so each layer keeps the highest band
// the cell reaches. Layers are independent and stack on top of one another.

use tracing::debug;

use crate::error::ConfigError;
use crate::grid::{Direction, Grid, HeightGrid};
use crate::profile::{TileBand, validate_bands};

/// Occupancy and shading for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerClassification {
    /// Index into the classifier's band list of the band occupying each cell.
    pub occupant: Grid<Option<usize>>,
    /// Position of the cell's elevation inside its band, in [0, 1]. Present
    /// only when some band on this layer has an upper bound.
    pub relative: Option<Grid<f32>>,
}

impl LayerClassification {
    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.occupant.get(x, y).is_some()
    }

    pub fn occupancy(&self) -> Grid<bool> {
        self.occupant.map(Option::is_some)
    }

    pub fn relative_elevation(&self, x: usize, y: usize) -> Option<f32> {
        self.relative.as_ref().map(|g| *g.get(x, y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    bands: Vec<TileBand>,
    layers: Vec<LayerClassification>,
}

impl Classification {
    pub fn layers(&self) -> &[LayerClassification] {
        &self.layers
    }

    pub fn layer(&self, layer: usize) -> Option<&LayerClassification> {
        self.layers.get(layer)
    }

    pub fn bands(&self) -> &[TileBand] {
        &self.bands
    }

    pub fn is_occupied(&self, x: usize, y: usize, layer: usize) -> bool {
        self.layer(layer).is_some_and(|l| l.is_occupied(x, y))
    }

    pub fn occupant(&self, x: usize, y: usize, layer: usize) -> Option<&TileBand> {
        let index = (*self.layer(layer)?.occupant.get(x, y))?;
        self.bands.get(index)
    }

    // True when the neighbour in `dir` holds the same band on this layer
    pub fn same_type_neighbor(&self, x: usize, y: usize, layer: usize, dir: Direction) -> bool {
        let Some(l) = self.layer(layer) else {
            return false;
        };
        let Some(own) = *l.occupant.get(x, y) else {
            return false;
        };
        l.occupant
            .neighbor(x, y, dir)
            .is_some_and(|(nx, ny)| *l.occupant.get(nx, ny) == Some(own))
    }

    // 4-bit autotile index: N=1, E=2, S=4, W=8
    pub fn adjacency_mask(&self, x: usize, y: usize, layer: usize) -> u8 {
        Direction::ALL
            .iter()
            .filter(|&&dir| self.same_type_neighbor(x, y, layer, dir))
            .map(|dir| dir.bit())
            .sum()
    }
}

pub struct TileClassifier {
    bands: Vec<TileBand>,
    layer_count: usize,
}

impl TileClassifier {
    pub fn new(bands: &[TileBand], layer_count: usize) -> Result<Self, ConfigError> {
        if layer_count == 0 {
            return Err(ConfigError::NoLayers);
        }
        validate_bands(bands, layer_count)?;
        let mut bands = bands.to_vec();
        // stable: equal thresholds keep their declared order
        bands.sort_by(|a, b| a.start_elevation.total_cmp(&b.start_elevation));
        Ok(Self { bands, layer_count })
    }

    pub fn bands(&self) -> &[TileBand] {
        &self.bands
    }

    pub fn classify(&self, height: &HeightGrid) -> Classification {
        self.classify_with(height, true)
    }

    pub fn classify_with(&self, height: &HeightGrid, relative: bool) -> Classification {
        let size = height.size();
        let mut layers: Vec<LayerClassification> = (0..self.layer_count)
            .map(|layer| {
                let shaded = relative
                    && self
                        .bands
                        .iter()
                        .any(|b| b.layer == layer && b.end_elevation.is_some());
                LayerClassification {
                    occupant: Grid::filled(size, None),
                    relative: shaded.then(|| Grid::filled(size, 0.0)),
                }
            })
            .collect();

        for (x, y, &e) in height.iter() {
            for (index, band) in self.bands.iter().enumerate() {
                if e < band.start_elevation {
                    continue;
                }
                let layer = &mut layers[band.layer];
                layer.occupant.set(x, y, Some(index));
                if let (Some(end), Some(grid)) = (band.end_elevation, layer.relative.as_mut()) {
                    let t = (e - band.start_elevation) / (end - band.start_elevation);
                    grid.set(x, y, t.clamp(0.0, 1.0));
                }
            }
        }

        debug!(
            size,
            bands = self.bands.len(),
            layers = self.layer_count,
            "classified tiles"
        );
        Classification {
            bands: self.bands.clone(),
            layers,
        }
    }
}
