use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Input-handling phase of an attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No start cell chosen yet.
    Searching,
    /// A head exists and direction input is accepted.
    Moving,
}

impl Phase {
    pub const fn is_searching(self) -> bool {
        matches!(self, Self::Searching)
    }

    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Moving)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Searching
    }
}

/// Pointer slack, in cells, required before a direction is inferred at an
/// ambiguous fork. Taken from the original game as observed; tunable, not
/// derived.
pub const FORK_TOLERANCE: i32 = 2;

/// Movement-stack entries kept inline before spilling to the heap.
const PATH_INLINE: usize = 64;

/// Move-resolution engine: a state machine over one [`Grid`].
///
/// Holds the phase, the movement stack (the simple path walked so far, start
/// first), and the level definition the grid is rebuilt from on reset. The
/// head is the last stack entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveEngine {
    definition: LevelDefinition,
    grid: Grid,
    phase: Phase,
    movements: SmallVec<[Coord2; PATH_INLINE]>,
}

impl MoveEngine {
    pub fn new(definition: LevelDefinition) -> Self {
        let grid = Grid::new(&definition);
        Self {
            definition,
            grid,
            phase: Phase::default(),
            movements: SmallVec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    /// Current end of the path, `None` while searching for a start.
    pub fn head(&self) -> Option<Coord2> {
        self.movements.last().copied()
    }

    /// The path walked so far, start cell first.
    pub fn path(&self) -> &[Coord2] {
        &self.movements
    }

    pub fn is_finished(&self) -> bool {
        self.grid.is_finished()
    }

    /// Picks the start cell. Only `Empty` cells qualify; anything else is
    /// ignored. Selecting the only empty cell of a level solves it on the
    /// spot.
    pub fn select_cell(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        if !self.phase.is_searching() {
            return Ok(NoChange);
        }

        match self.grid.cell_at(coords)? {
            Cell::Empty => {
                self.grid.set_blocked(coords)?;
                self.movements.push(coords);
                self.phase = Phase::Moving;
                log::debug!("start cell selected at {:?}", coords);

                Ok(if self.grid.is_finished() { Solved } else { Selected })
            }
            _ => Ok(NoChange),
        }
    }

    /// Resolves an imprecise pointer target into a slide, if the target
    /// clears the inference rules. No matching rule is a no-op.
    pub fn request_direction(&mut self, target: Coord2) -> Result<MoveOutcome> {
        let Some(head) = self.head() else {
            return Ok(MoveOutcome::NoChange);
        };

        match self.infer_direction(head, target)? {
            Some(direction) => self.move_head(direction),
            None => Ok(MoveOutcome::NoChange),
        }
    }

    /// Direction inference, checked in fixed priority order.
    ///
    /// With a single open exit the head commits immediately (tolerance 0);
    /// at a fork the target must clear [`FORK_TOLERANCE`] cells of margin so
    /// a jittery pointer cannot pick a branch the player did not mean. An
    /// exact row/column match is trusted without the adjacent-cell check,
    /// which lets a straight multi-cell drag resolve in one request; the
    /// slide itself re-validates every step.
    fn infer_direction(&self, head: Coord2, target: Coord2) -> Result<Option<Direction>> {
        use Direction::*;

        let tolerance = if self.grid.open_exits(head) == 1 {
            0
        } else {
            FORK_TOLERANCE
        };

        let (h_line, h_col) = (i32::from(head.0), i32::from(head.1));
        let (t_line, t_col) = (i32::from(target.0), i32::from(target.1));

        for direction in Direction::ALL {
            let (exact, cleared) = match direction {
                Right => (
                    h_line == t_line && h_col < t_col,
                    (h_line - t_line).abs() <= 1 && h_col + tolerance < t_col,
                ),
                Left => (
                    h_line == t_line && h_col > t_col,
                    (h_line - t_line).abs() <= 1 && h_col - tolerance > t_col,
                ),
                Down => (
                    h_col == t_col && h_line < t_line,
                    (h_col - t_col).abs() <= 1 && h_line + tolerance < t_line,
                ),
                Up => (
                    h_col == t_col && h_line > t_line,
                    (h_col - t_col).abs() <= 1 && h_line - tolerance > t_line,
                ),
            };

            if exact {
                return Ok(Some(direction));
            }
            if cleared && self.neighbor_is_empty(head, direction)? {
                return Ok(Some(direction));
            }
        }

        Ok(None)
    }

    fn neighbor_is_empty(&self, head: Coord2, direction: Direction) -> Result<bool> {
        match step(head, direction, self.grid.size()) {
            Some(next) => Ok(self.grid.cell_at(next)?.is_empty()),
            None => Ok(false),
        }
    }

    /// Executes one directional move: slide forward over empty cells, or
    /// backtrack when the adjacent cell is part of the walked path. A wall
    /// ahead is a no-op. Reports `Solved` once the grid has no empty cell
    /// left.
    pub fn move_head(&mut self, direction: Direction) -> Result<MoveOutcome> {
        use MoveOutcome::*;

        let Some(head) = self.head() else {
            return Ok(NoChange);
        };

        let Some(next) = step(head, direction, self.grid.size()) else {
            return Ok(NoChange);
        };

        let outcome = match self.grid.cell_at(next)? {
            Cell::Empty => self.slide(next, direction)?,
            Cell::Blocked => self.backtrack(next, direction)?,
            Cell::Wall => NoChange,
        };

        if self.grid.is_finished() {
            log::debug!("level solved, path covers {} cells", self.movements.len());
            Ok(outcome | Solved)
        } else {
            Ok(outcome)
        }
    }

    /// Advances the head through consecutive empty cells, visiting each one,
    /// and stops on the last empty cell before a wall or blocked cell.
    fn slide(&mut self, first: Coord2, direction: Direction) -> Result<MoveOutcome> {
        let bounds = self.grid.size();
        let mut next = first;

        while self.grid.cell_at(next)?.is_empty() {
            let head = next;
            self.grid.set_blocked(head)?;
            self.movements.push(head);
            log::trace!("slid onto {:?}", head);

            match step(head, direction, bounds) {
                Some(ahead) => next = ahead,
                None => break,
            }
        }

        log::debug!("slide {:?} stopped at {:?}", direction, self.head());
        Ok(MoveOutcome::Moved)
    }

    /// Undoes the path while it retraces a straight blocked run behind the
    /// head, restoring each undone cell to empty.
    ///
    /// Each pop is checked against the cell the retrace expects next; a pop
    /// that leaves the stack top elsewhere oversteps the run, so it is
    /// pushed back, re-blocked, and the undo stops. The stack stays a
    /// simple path throughout.
    fn backtrack(&mut self, first: Coord2, direction: Direction) -> Result<MoveOutcome> {
        let bounds = self.grid.size();
        let mut next = first;
        let mut undone = false;

        while self.grid.cell_at(next)?.is_blocked() {
            let Some(popped) = self.movements.pop() else {
                break;
            };
            self.grid.set_empty(popped)?;

            match self.movements.last() {
                Some(&top) if top == next => {
                    undone = true;
                    log::trace!("undid {:?}", popped);
                    match step(next, direction, bounds) {
                        Some(ahead) => next = ahead,
                        None => break,
                    }
                }
                _ => {
                    // overstepped: this pop is not on the retraced run
                    self.grid.set_blocked(popped)?;
                    self.movements.push(popped);
                    break;
                }
            }
        }

        if undone {
            log::debug!("backtracked to {:?}", self.head());
        }
        Ok(if undone {
            MoveOutcome::Moved
        } else {
            MoveOutcome::NoChange
        })
    }

    /// Abandons the current attempt: fresh grid, cleared path, searching
    /// phase. The level definition is retained, not re-parsed.
    pub fn reset(&mut self) {
        self.grid = Grid::new(&self.definition);
        self.movements.clear();
        self.phase = Phase::Searching;
        log::debug!("engine reset");
    }
}
