// Square row-major grid addressed as (x, y), y growing northward.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    size: usize,
    data: Vec<T>,
}

// Elevation grid, values in [0, 1] once the heightmap pass is done
pub type HeightGrid = Grid<f32>;

// Graded boundary mask, values in [0, 1]
pub type EdgeMask = Grid<f32>;

/// The four cardinal neighbours used for boundary detection and autotiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    // Autotile bit: N=1, E=2, S=4, W=8
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 8,
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(size: usize) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T> Grid<T> {
    // Wrap an existing row-major buffer; None if the length isn't size².
    pub fn from_vec(size: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == size * size).then_some(Self { size, data })
    }

    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size, "({x}, {y}) out of bounds");
        y * self.size + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let i = self.idx(x, y);
        &mut self.data[i]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    // Coordinates of the neighbour in `dir`, or None past the edge
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.offset();
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        self.in_bounds(nx, ny).then(|| (nx as usize, ny as usize))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            size: self.size,
            data: self.data.iter().map(|v| f(v)).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let size = self.size;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % size, i / size, v))
    }

    // Flat row-major view, e.g. for texture upload or serialization
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Grid};

    #[test]
    fn grid_row_major_layout() {
        let g = Grid::from_fn(3, |x, y| (y * 10 + x) as i32);
        assert_eq!(g.as_slice()[0..3], [0, 1, 2]);
        assert_eq!(*g.get(2, 1), 12);
        assert_eq!(g.as_slice()[5], 12);
    }

    #[test]
    fn grid_neighbor_clips_at_edges() {
        let g: Grid<u8> = Grid::new(4);
        assert_eq!(g.neighbor(0, 0, Direction::West), None);
        assert_eq!(g.neighbor(0, 0, Direction::South), None);
        assert_eq!(g.neighbor(0, 0, Direction::North), Some((0, 1)));
        assert_eq!(g.neighbor(3, 3, Direction::East), None);
        assert_eq!(g.neighbor(3, 3, Direction::West), Some((2, 3)));
    }

    #[test]
    fn grid_from_vec_rejects_bad_length() {
        assert!(Grid::from_vec(2, vec![0.0f32; 3]).is_none());
        assert!(Grid::from_vec(2, vec![0.0f32; 4]).is_some());
    }

    #[test]
    fn direction_bits_are_distinct() {
        let all: u8 = Direction::ALL.iter().map(|d| d.bit()).sum();
        assert_eq!(all, 15);
    }
}
