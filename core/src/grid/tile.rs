use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// Stable identity, assigned once per spawn and kept across slides and
/// merges so the caller can animate continuity.
pub type TileId = u32;

/// A single numbered piece on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: Coord,
    pub col: Coord,
    /// Set only on the tile produced by a merge during the most recent shift.
    pub just_merged: bool,
}

impl Tile {
    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Coordinates of one lane (row or column), ordered from the leading
    /// edge of travel. Lane `k` is row `k` for horizontal moves and column
    /// `k` for vertical ones.
    pub(crate) fn lane(self, size: Coord, lane: Coord) -> impl Iterator<Item = Coord2> {
        (0..size).map(move |step| match self {
            Direction::Left => (lane, step),
            Direction::Right => (lane, size - 1 - step),
            Direction::Up => (step, lane),
            Direction::Down => (size - 1 - step, lane),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_start_at_the_leading_edge() {
        let left: alloc::vec::Vec<_> = Direction::Left.lane(3, 1).collect();
        let down: alloc::vec::Vec<_> = Direction::Down.lane(3, 2).collect();

        assert_eq!(left, [(1, 0), (1, 1), (1, 2)]);
        assert_eq!(down, [(2, 2), (1, 2), (0, 2)]);
    }
}
