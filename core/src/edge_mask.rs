use tracing::debug;

use crate::grid::{Direction, EdgeMask, Grid, HeightGrid};

const CENTER_WEIGHT: f32 = 1.0;
const RING_WEIGHT: f32 = 0.5;

/// Which side of a predicate contour counts as the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    // P is false here and true on at least one 4-neighbour
    Outer,
    // P is true here and false on at least one 4-neighbour
    Inner,
}

/// Detects predicate boundaries and stamps a graded square around each one.
#[derive(Debug, Clone, Copy)]
pub struct EdgeMaskGenerator {
    radius: usize,
    mode: BoundaryMode,
}

impl EdgeMaskGenerator {
    pub fn new(radius: usize, mode: BoundaryMode) -> Self {
        Self { radius, mode }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    // Cells off the grid count as P = false
    pub fn is_boundary(&self, predicate: &Grid<bool>, x: usize, y: usize) -> bool {
        let here = *predicate.get(x, y);
        let neighbor = |dir| {
            predicate
                .neighbor(x, y, dir)
                .is_some_and(|(nx, ny)| *predicate.get(nx, ny))
        };
        match self.mode {
            BoundaryMode::Outer => !here && Direction::ALL.into_iter().any(neighbor),
            BoundaryMode::Inner => here && !Direction::ALL.into_iter().all(neighbor),
        }
    }

    pub fn boundary_cells(&self, predicate: &Grid<bool>) -> Vec<(usize, usize)> {
        predicate
            .iter()
            .filter(|&(x, y, _)| self.is_boundary(predicate, x, y))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    pub fn generate(&self, predicate: &Grid<bool>) -> EdgeMask {
        // detection finishes before any stamp is written
        let cells = self.boundary_cells(predicate);
        let mut mask = Grid::filled(predicate.size(), 0.0f32);
        self.stamp_into(&mut mask, &cells);
        debug!(
            boundary_cells = cells.len(),
            radius = self.radius,
            mode = ?self.mode,
            "stamped edge mask"
        );
        mask
    }

    // Max-combine a stamp around every cell; existing values never decrease
    pub fn stamp_into(&self, mask: &mut EdgeMask, cells: &[(usize, usize)]) {
        let size = mask.size();
        if size == 0 {
            return;
        }
        let r = self.radius;
        for &(cx, cy) in cells {
            let (x0, x1) = (cx.saturating_sub(r), cx.saturating_add(r).min(size - 1));
            let (y0, y1) = (cy.saturating_sub(r), cy.saturating_add(r).min(size - 1));
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let weight = if x == cx && y == cy {
                        CENTER_WEIGHT
                    } else {
                        RING_WEIGHT
                    };
                    let cell = mask.get_mut(x, y);
                    *cell = cell.max(weight);
                }
            }
        }
    }
}

pub fn predicate(height: &HeightGrid, f: impl Fn(f32) -> bool) -> Grid<bool> {
    height.map(|&e| f(e))
}

// Land cells touching water, graded outwards by `radius`
pub fn shoreline(height: &HeightGrid, water_level: f32, radius: usize) -> EdgeMask {
    let water = predicate(height, |e| e < water_level);
    EdgeMaskGenerator::new(radius, BoundaryMode::Outer).generate(&water)
}

// Cells at or above `level` that touch lower ground
pub fn material_blend(height: &HeightGrid, level: f32, radius: usize) -> EdgeMask {
    let above = predicate(height, |e| e >= level);
    EdgeMaskGenerator::new(radius, BoundaryMode::Inner).generate(&above)
}

// 1.0 strictly above the water level
pub fn ground_mask(height: &HeightGrid, water_level: f32) -> EdgeMask {
    height.map(|&e| if e > water_level { 1.0 } else { 0.0 })
}

// 1.0 strictly below the water level
pub fn water_mask(height: &HeightGrid, water_level: f32) -> EdgeMask {
    height.map(|&e| if e < water_level { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::{
        BoundaryMode, EdgeMaskGenerator, ground_mask, material_blend, predicate, shoreline,
        water_mask,
    };
    use crate::grid::Grid;

    // Rows listed from y = 0 upwards
    fn scenario_heights() -> Grid<f32> {
        Grid::from_vec(
            4,
            vec![
                0.1, 0.2, 0.5, 0.6, //
                0.2, 0.25, 0.55, 0.6, //
                0.4, 0.45, 0.7, 0.8, //
                0.5, 0.6, 0.8, 0.9,
            ],
        )
        .unwrap()
    }

    fn mask_rows(mask: &Grid<f32>) -> Vec<Vec<f32>> {
        mask.as_slice()
            .chunks(mask.size())
            .map(|row| row.to_vec())
            .collect()
    }

    #[test]
    fn shoreline_scenario_exact_weights() {
        let height = scenario_heights();
        let water = predicate(&height, |e| e < 0.3);
        let generator = EdgeMaskGenerator::new(1, BoundaryMode::Outer);
        assert_eq!(
            generator.boundary_cells(&water),
            vec![(2, 0), (2, 1), (0, 2), (1, 2)]
        );

        let mask = shoreline(&height, 0.3, 1);
        assert_eq!(
            mask_rows(&mask),
            vec![
                vec![0.0, 0.5, 1.0, 0.5],
                vec![0.5, 0.5, 1.0, 0.5],
                vec![1.0, 1.0, 0.5, 0.5],
                vec![0.5, 0.5, 0.5, 0.0],
            ]
        );
    }

    #[test]
    fn zero_radius_marks_only_boundary_cells() {
        let mask = shoreline(&scenario_heights(), 0.3, 0);
        let lit: Vec<(usize, usize)> = mask
            .iter()
            .filter(|&(_, _, &v)| v > 0.0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(lit, vec![(2, 0), (2, 1), (0, 2), (1, 2)]);
        assert!(mask.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn mask_is_zero_beyond_radius() {
        let size = 12;
        let height = Grid::from_fn(size, |x, y| {
            if (4..8).contains(&x) && (4..8).contains(&y) {
                0.0
            } else {
                1.0
            }
        });
        let water = predicate(&height, |e| e < 0.5);
        for r in 0..3 {
            let generator = EdgeMaskGenerator::new(r, BoundaryMode::Outer);
            let cells = generator.boundary_cells(&water);
            let mask = generator.generate(&water);
            for (x, y, &v) in mask.iter() {
                let near = cells
                    .iter()
                    .any(|&(bx, by)| bx.abs_diff(x) <= r && by.abs_diff(y) <= r);
                if !near {
                    assert_eq!(v, 0.0, "({x}, {y}) should be clear at r = {r}");
                } else {
                    assert!(v >= 0.5);
                }
            }
        }
    }

    #[test]
    fn stamping_twice_is_idempotent() {
        let height = scenario_heights();
        let water = predicate(&height, |e| e < 0.3);
        let generator = EdgeMaskGenerator::new(2, BoundaryMode::Outer);
        let cells = generator.boundary_cells(&water);

        let once = generator.generate(&water);
        let mut twice = once.clone();
        generator.stamp_into(&mut twice, &cells);
        assert_eq!(once, twice);
    }

    #[test]
    fn ring_never_lowers_a_center() {
        // Two adjacent boundary cells: each sits in the other's ring
        let generator = EdgeMaskGenerator::new(1, BoundaryMode::Outer);
        let mut mask = Grid::filled(5, 0.0f32);
        generator.stamp_into(&mut mask, &[(1, 1), (2, 1)]);
        assert_eq!(*mask.get(1, 1), 1.0);
        assert_eq!(*mask.get(2, 1), 1.0);
        assert_eq!(*mask.get(3, 2), 0.5);
        assert_eq!(*mask.get(4, 1), 0.0);
    }

    #[test]
    fn huge_radius_covers_whole_grid() {
        for r in [6, 64, usize::MAX] {
            let generator = EdgeMaskGenerator::new(r, BoundaryMode::Outer);
            let mut mask = Grid::filled(6, 0.0f32);
            generator.stamp_into(&mut mask, &[(4, 1)]);
            assert_eq!(*mask.get(4, 1), 1.0, "center lost at r = {r}");
            let ring = mask.iter().filter(|&(_, _, &v)| v == 0.5).count();
            assert_eq!(ring, 35, "window not full at r = {r}");
        }
        // through the whole pipeline entry point as well
        let mask = shoreline(&scenario_heights(), 0.3, usize::MAX);
        assert!(mask.as_slice().iter().all(|&v| v >= 0.5));
    }

    #[test]
    fn inner_mode_treats_grid_edge_as_boundary() {
        let above = Grid::filled(3, true);
        let generator = EdgeMaskGenerator::new(0, BoundaryMode::Inner);
        let cells = generator.boundary_cells(&above);
        // everything except the center touches the outside
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&(1, 1)));
    }

    #[test]
    fn material_blend_marks_upper_side_of_contour() {
        let height = Grid::from_fn(6, |x, _| if x >= 3 { 0.8 } else { 0.2 });
        let mask = material_blend(&height, 0.5, 0);
        for y in 0..6 {
            assert_eq!(*mask.get(3, y), 1.0);
            assert_eq!(*mask.get(2, y), 0.0);
            assert_eq!(*mask.get(4, y), if y == 0 || y == 5 { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn ground_and_water_masks_split_at_level() {
        let height = Grid::from_vec(2, vec![0.1, 0.3, 0.5, 0.3]).unwrap();
        assert_eq!(ground_mask(&height, 0.3).as_slice(), &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(water_mask(&height, 0.3).as_slice(), &[1.0, 0.0, 0.0, 0.0]);
    }
}
