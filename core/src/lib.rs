#![no_std]

extern crate alloc;

use core::num::Saturating;
use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use levels::*;
pub use progress::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod levels;
mod progress;
mod types;

/// Validated, immutable description of a level.
///
/// A definition is checked once, at construction: rectangular, fully walled
/// border, only `Wall` and `Empty` cells. [`Grid`]s are instantiated from it
/// and rebuilt from it on every restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    cells: Array2<Cell>,
}

impl LevelDefinition {
    /// Parses the level text format: one row per line, `#` for walls and
    /// `.` for empty cells. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, LevelFormatError> {
        let mut rows: alloc::vec::Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }

        let height = rows.len();
        if height == 0 {
            return Err(LevelFormatError::EmptyDefinition);
        }
        Self::check_side(height)?;

        let width = rows[0].chars().count();
        Self::check_side(width)?;

        let mut cells = Array2::from_elem([height, width], Cell::Wall);
        for (line, row) in rows.iter().enumerate() {
            let mut row_width = 0;
            for (col, symbol) in row.chars().enumerate() {
                if col >= width {
                    return Err(LevelFormatError::NotRectangular { line: line as Coord });
                }
                cells[[line, col]] =
                    Cell::from_symbol(symbol).ok_or(LevelFormatError::InvalidSymbol {
                        symbol,
                        line: line as Coord,
                        col: col as Coord,
                    })?;
                row_width += 1;
            }
            if row_width != width {
                return Err(LevelFormatError::NotRectangular { line: line as Coord });
            }
        }

        Self::from_cells(cells)
    }

    /// Validates a prebuilt cell matrix. Rectangularity is structural here;
    /// the border and symbol checks still apply, and a `Blocked` cell is
    /// rejected since visits only happen during play.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self, LevelFormatError> {
        let (height, width) = cells.dim();
        if height == 0 || width == 0 {
            return Err(LevelFormatError::EmptyDefinition);
        }
        Self::check_side(height)?;
        Self::check_side(width)?;

        for ((line, col), &cell) in cells.indexed_iter() {
            if cell.is_blocked() {
                return Err(LevelFormatError::PreBlocked {
                    line: line as Coord,
                    col: col as Coord,
                });
            }
            let on_border = line == 0 || line == height - 1 || col == 0 || col == width - 1;
            if on_border && !cell.is_wall() {
                return Err(LevelFormatError::OpenBorder {
                    line: line as Coord,
                    col: col as Coord,
                });
            }
        }

        Ok(Self { cells })
    }

    fn check_side(side: usize) -> Result<(), LevelFormatError> {
        let max = usize::from(Coord::MAX);
        if side > max {
            Err(LevelFormatError::TooLarge { max })
        } else {
            Ok(())
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    /// Number of cells a player has to visit.
    pub fn empty_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .count()
            .try_into()
            .unwrap()
    }
}

impl Index<Coord2> for LevelDefinition {
    type Output = Cell;

    fn index(&self, (line, col): Coord2) -> &Self::Output {
        &self.cells[(line as usize, col as usize)]
    }
}

/// Mutable play-time state of a level: the cell matrix plus a running count
/// of cells still to visit, so [`Grid::is_finished`] is a counter compare.
///
/// A grid belongs to exactly one [`MoveEngine`] for the duration of an
/// attempt; all mutation goes through that engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    empty_count: Saturating<CellCount>,
}

impl Grid {
    pub fn new(definition: &LevelDefinition) -> Self {
        Self {
            cells: definition.cells.clone(),
            empty_count: Saturating(definition.empty_count()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2, PositionError> {
        let (height, width) = self.size();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(PositionError {
                line: coords.0,
                col: coords.1,
                height,
                width,
            })
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell, PositionError> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Marks a visited cell. The cell must currently be `Empty`.
    pub fn set_blocked(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        match self.cells[coords.to_nd_index()] {
            Cell::Empty => {
                self.cells[coords.to_nd_index()] = Cell::Blocked;
                self.empty_count -= 1;
                Ok(())
            }
            found => Err(StateError::NotEmpty {
                line: coords.0,
                col: coords.1,
                found,
            }
            .into()),
        }
    }

    /// Un-visits a cell. The cell must currently be `Blocked`.
    pub fn set_empty(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        match self.cells[coords.to_nd_index()] {
            Cell::Blocked => {
                self.cells[coords.to_nd_index()] = Cell::Empty;
                self.empty_count += 1;
                Ok(())
            }
            found => Err(StateError::NotBlocked {
                line: coords.0,
                col: coords.1,
                found,
            }
            .into()),
        }
    }

    /// True once no `Empty` cell is left, i.e. the level is solved.
    pub fn is_finished(&self) -> bool {
        self.empty_count == Saturating(0)
    }

    /// Number of cardinal neighbors of `coords` that are still `Empty`.
    pub fn open_exits(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_cardinal(coords)
            .filter(|&(_, pos)| self.cells[pos.to_nd_index()].is_empty())
            .count()
            .try_into()
            .unwrap()
    }
}

/// Outcome of a start-cell selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    Selected,
    Solved,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Selected => true,
            Self::Solved => true,
        }
    }
}

/// Outcome of a move request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Moved,
    Solved,
}

impl MoveOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            Solved => true,
        }
    }
}

/// Used to merge the movement outcome with the solved check
impl BitOr for MoveOutcome {
    type Output = MoveOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use MoveOutcome::*;
        match (self, rhs) {
            (Solved, _) => Solved,
            (_, Solved) => Solved,
            (Moved, _) => Moved,
            (_, Moved) => Moved,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: &str = "\
#####
#...#
#.#.#
#...#
#####
";

    #[test]
    fn parse_reads_size_and_cells() {
        let level = LevelDefinition::parse(RING).unwrap();
        assert_eq!(level.size(), (5, 5));
        assert_eq!(level[(0, 0)], Cell::Wall);
        assert_eq!(level[(1, 1)], Cell::Empty);
        assert_eq!(level[(2, 2)], Cell::Wall);
        assert_eq!(level.empty_count(), 8);
    }

    #[test]
    fn parse_rejects_empty_text() {
        assert_eq!(
            LevelDefinition::parse(""),
            Err(LevelFormatError::EmptyDefinition)
        );
        assert_eq!(
            LevelDefinition::parse("\n\n"),
            Err(LevelFormatError::EmptyDefinition)
        );
    }

    #[test]
    fn parse_rejects_ragged_lines() {
        assert_eq!(
            LevelDefinition::parse("####\n#.#\n####"),
            Err(LevelFormatError::NotRectangular { line: 1 })
        );
        assert_eq!(
            LevelDefinition::parse("###\n#.##\n###"),
            Err(LevelFormatError::NotRectangular { line: 1 })
        );
    }

    #[test]
    fn parse_rejects_open_border() {
        assert_eq!(
            LevelDefinition::parse("###\n..#\n###"),
            Err(LevelFormatError::OpenBorder { line: 1, col: 0 })
        );
        assert_eq!(
            LevelDefinition::parse("#.#\n#.#\n###"),
            Err(LevelFormatError::OpenBorder { line: 0, col: 1 })
        );
    }

    #[test]
    fn parse_rejects_unknown_symbols() {
        assert_eq!(
            LevelDefinition::parse("###\n#x#\n###"),
            Err(LevelFormatError::InvalidSymbol {
                symbol: 'x',
                line: 1,
                col: 1
            })
        );
    }

    #[test]
    fn parse_rejects_oversized_levels() {
        use alloc::string::String;

        let wide = "#".repeat(300);
        assert_eq!(
            LevelDefinition::parse(&wide),
            Err(LevelFormatError::TooLarge { max: 255 })
        );

        let mut tall = String::new();
        for _ in 0..300 {
            tall.push_str("###\n");
        }
        assert_eq!(
            LevelDefinition::parse(&tall),
            Err(LevelFormatError::TooLarge { max: 255 })
        );
    }

    #[test]
    fn from_cells_rejects_preblocked_cells() {
        let mut cells = Array2::from_elem([3, 3], Cell::Wall);
        cells[[1, 1]] = Cell::Blocked;
        assert_eq!(
            LevelDefinition::from_cells(cells),
            Err(LevelFormatError::PreBlocked { line: 1, col: 1 })
        );
    }

    #[test]
    fn all_wall_level_is_finished_from_the_start() {
        let level = LevelDefinition::parse("##\n##").unwrap();
        assert!(Grid::new(&level).is_finished());
    }

    #[test]
    fn grid_transitions_round_trip() {
        let level = LevelDefinition::parse(RING).unwrap();
        let fresh = Grid::new(&level);
        let mut grid = fresh.clone();
        assert!(!grid.is_finished());

        grid.set_blocked((1, 1)).unwrap();
        assert_eq!(grid.cell_at((1, 1)), Ok(Cell::Blocked));
        grid.set_empty((1, 1)).unwrap();
        assert_eq!(grid, fresh);
    }

    #[test]
    fn grid_rejects_illegal_transitions() {
        let level = LevelDefinition::parse(RING).unwrap();
        let mut grid = Grid::new(&level);

        assert_eq!(
            grid.set_blocked((0, 0)),
            Err(StateError::NotEmpty {
                line: 0,
                col: 0,
                found: Cell::Wall
            }
            .into())
        );
        assert_eq!(
            grid.set_empty((1, 1)),
            Err(StateError::NotBlocked {
                line: 1,
                col: 1,
                found: Cell::Empty
            }
            .into())
        );
    }

    #[test]
    fn grid_rejects_out_of_bounds_access() {
        let level = LevelDefinition::parse(RING).unwrap();
        let mut grid = Grid::new(&level);

        assert_eq!(
            grid.cell_at((5, 0)),
            Err(PositionError {
                line: 5,
                col: 0,
                height: 5,
                width: 5
            })
        );
        assert!(matches!(
            grid.set_blocked((0, 9)),
            Err(GridError::Position(_))
        ));
    }

    #[test]
    fn is_finished_tracks_remaining_empty_cells() {
        let level = LevelDefinition::parse("###\n#.#\n###").unwrap();
        let mut grid = Grid::new(&level);
        assert!(!grid.is_finished());
        grid.set_blocked((1, 1)).unwrap();
        assert!(grid.is_finished());
        grid.set_empty((1, 1)).unwrap();
        assert!(!grid.is_finished());
    }

    #[test]
    fn open_exits_counts_empty_cardinal_neighbors() {
        let level = LevelDefinition::parse(RING).unwrap();
        let mut grid = Grid::new(&level);
        assert_eq!(grid.open_exits((1, 1)), 2);
        grid.set_blocked((2, 1)).unwrap();
        assert_eq!(grid.open_exits((1, 1)), 1);
        assert_eq!(grid.open_exits((0, 0)), 0);
    }

    #[test]
    fn cell_symbols_round_trip() {
        for cell in [Cell::Wall, Cell::Empty] {
            assert_eq!(Cell::from_symbol(cell.symbol()), Some(cell));
        }
        assert_eq!(Cell::from_symbol('o'), None);
    }

    #[test]
    fn move_outcome_merge_prefers_solved() {
        use MoveOutcome::*;
        assert_eq!(Moved | Solved, Solved);
        assert_eq!(NoChange | Moved, Moved);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
