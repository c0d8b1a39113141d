use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for level width, height, and positions.
pub type Coord = u8;

/// Count type used for cell totals and visited-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(line, col)`, 0-based from the top-left.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// The four sliding directions, listed in inference priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

    /// Unit `(line, col)` delta for this direction.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Right => (0, 1),
            Self::Left => (0, -1),
            Self::Down => (1, 0),
            Self::Up => (-1, 0),
        }
    }
}

pub trait CardinalIterExt {
    fn iter_cardinal(&self, index: Coord2) -> CardinalIter;
}

impl<T> CardinalIterExt for Array2<T> {
    fn iter_cardinal(&self, index: Coord2) -> CardinalIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        CardinalIter::new(index, size)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (line, col) = coords;
    let (d_line, d_col) = delta;
    let (max_line, max_col) = bounds;

    let next_line = line.checked_add_signed(d_line.try_into().ok()?)?;
    if next_line >= max_line {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_line, next_col))
}

/// One cell ahead of `coords` in `direction`, while that stays in bounds.
pub fn step(coords: Coord2, direction: Direction, bounds: Coord2) -> Option<Coord2> {
    apply_delta(coords, direction.delta(), bounds)
}

#[derive(Debug)]
pub struct CardinalIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl CardinalIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for CardinalIter {
    type Item = (Direction, Coord2);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= Direction::ALL.len() {
                return None;
            }

            let direction = Direction::ALL[self.index as usize];
            let next_item = step(self.center, direction, self.bounds);
            self.index += 1;

            if let Some(coords) = next_item {
                return Some((direction, coords));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_bounds() {
        assert_eq!(step((1, 1), Direction::Right, (3, 3)), Some((1, 2)));
        assert_eq!(step((1, 2), Direction::Right, (3, 3)), None);
        assert_eq!(step((0, 1), Direction::Up, (3, 3)), None);
        assert_eq!(step((2, 1), Direction::Down, (3, 3)), None);
        assert_eq!(step((1, 0), Direction::Left, (3, 3)), None);
    }

    #[test]
    fn cardinal_iter_center_yields_all_directions() {
        let grid: Array2<u8> = Array2::zeros((3, 3));
        let neighbors: alloc::vec::Vec<_> = grid.iter_cardinal((1, 1)).collect();
        assert_eq!(
            neighbors,
            [
                (Direction::Right, (1, 2)),
                (Direction::Left, (1, 0)),
                (Direction::Down, (2, 1)),
                (Direction::Up, (0, 1)),
            ]
        );
    }

    #[test]
    fn cardinal_iter_corner_is_clipped() {
        let grid: Array2<u8> = Array2::zeros((3, 3));
        let neighbors: alloc::vec::Vec<_> = grid.iter_cardinal((0, 0)).collect();
        assert_eq!(
            neighbors,
            [(Direction::Right, (0, 1)), (Direction::Down, (1, 0))]
        );
    }
}
