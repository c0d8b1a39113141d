use serde::{Deserialize, Serialize};

/// State of a single level cell.
///
/// `Wall` never changes; `Empty` and `Blocked` convert into each other one
/// visit (or undo) at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Empty,
    Blocked,
}

impl Cell {
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Cell for a level-text symbol, `None` for anything unrecognized.
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Empty),
            _ => None,
        }
    }

    /// Level-text symbol for this cell; `Blocked` renders as the path marker.
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => '.',
            Self::Blocked => 'o',
        }
    }
}
