use thiserror::Error;

use crate::{Cell, Coord};

/// Fatal level-construction errors. A definition that fails here produces no
/// object and must not be played.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LevelFormatError {
    #[error("level definition has no cells")]
    EmptyDefinition,
    #[error("level exceeds {max} cells per side")]
    TooLarge { max: usize },
    #[error("line {line} differs in width from line 0")]
    NotRectangular { line: Coord },
    #[error("border is open at line {line}, column {col}")]
    OpenBorder { line: Coord, col: Coord },
    #[error("invalid symbol {symbol:?} at line {line}, column {col}")]
    InvalidSymbol {
        symbol: char,
        line: Coord,
        col: Coord,
    },
    #[error("cell at line {line}, column {col} is blocked before play")]
    PreBlocked { line: Coord, col: Coord },
}

/// Access outside the grid. Indicates the caller skipped coordinate
/// validation, so it propagates instead of being handled.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("position line={line}, col={col} outside {height}x{width} grid")]
pub struct PositionError {
    pub line: Coord,
    pub col: Coord,
    pub height: Coord,
    pub width: Coord,
}

/// Illegal cell transition. Only `Empty` cells can be blocked and only
/// `Blocked` cells can be emptied; anything else is a caller defect.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("cell at line {line}, column {col} is {found:?}, expected Empty")]
    NotEmpty {
        line: Coord,
        col: Coord,
        found: Cell,
    },
    #[error("cell at line {line}, column {col} is {found:?}, expected Blocked")]
    NotBlocked {
        line: Coord,
        col: Coord,
        found: Cell,
    },
}

/// Contract-violation errors raised by grid operations.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    State(#[from] StateError),
}

pub type Result<T, E = GridError> = core::result::Result<T, E>;
