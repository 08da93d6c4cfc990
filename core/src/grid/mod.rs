use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub use tile::*;

mod tile;

/// Reaching this tile value wins the game.
pub const WIN_VALUE: u32 = 2048;

/// Probability that a spawned tile is a 2 (otherwise a 4).
const TWO_CHANCE: f64 = 0.9;

/// Immutable sliding-tile board. Every accepted shift produces a brand-new
/// board value; the previous snapshot is never touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    size: Coord,
    tiles: Vec<Tile>,
    score: u32,
    next_id: TileId,
}

impl Board {
    /// Empty board of the configured size with two seeded starting tiles.
    pub fn new<R: RandomSource>(config: GridConfig, rng: &mut R) -> Self {
        let mut board = Self {
            size: config.size,
            tiles: Vec::new(),
            score: 0,
            next_id: 0,
        };
        board.spawn_tile(rng);
        board.spawn_tile(rng);
        board
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.coords() == coords)
    }

    pub fn has_won(&self) -> bool {
        self.tiles.iter().any(|tile| tile.value >= WIN_VALUE)
    }

    /// Lost when the grid is full and no horizontal or vertical neighbor
    /// pair is equal, so every direction would be a no-op.
    pub fn has_lost(&self) -> bool {
        if self.tiles.len() < usize::from(mult(self.size, self.size)) {
            return false;
        }

        let grid = self.occupancy();
        let n = usize::from(self.size);
        for row in 0..n {
            for col in 0..n {
                let value = grid[[row, col]].map(|tile| tile.value);
                if col + 1 < n && value == grid[[row, col + 1]].map(|tile| tile.value) {
                    return false;
                }
                if row + 1 < n && value == grid[[row + 1, col]].map(|tile| tile.value) {
                    return false;
                }
            }
        }
        true
    }

    /// Shift every lane toward `direction`: compress, merge adjacent equal
    /// pairs once each, compress again. A move that changes nothing returns
    /// an identical board (no spawn, no score change); any other move spawns
    /// exactly one tile at a random empty cell.
    pub fn shift<R: RandomSource>(&self, direction: Direction, rng: &mut R) -> Self {
        let mut grid = self.occupancy();
        let mut gained = 0u32;
        let mut moved = false;

        for lane in 0..self.size {
            let coords: SmallVec<[Coord2; 16]> = direction.lane(self.size, lane).collect();

            let mut line: SmallVec<[Tile; 16]> = SmallVec::new();
            for &cell in &coords {
                if let Some(mut tile) = grid[cell.to_nd_index()].take() {
                    tile.just_merged = false;
                    line.push(tile);
                }
            }

            let mut packed: SmallVec<[Tile; 16]> = SmallVec::new();
            let mut i = 0;
            while i < line.len() {
                if i + 1 < line.len() && line[i].value == line[i + 1].value {
                    // the leading tile keeps its identity; the pair is
                    // consumed so a merged tile can never merge again
                    let mut tile = line[i];
                    tile.value *= 2;
                    tile.just_merged = true;
                    gained += tile.value;
                    packed.push(tile);
                    i += 2;
                } else {
                    packed.push(line[i]);
                    i += 1;
                }
            }

            for (slot, mut tile) in packed.into_iter().enumerate() {
                let (row, col) = coords[slot];
                if tile.coords() != (row, col) || tile.just_merged {
                    moved = true;
                }
                tile.row = row;
                tile.col = col;
                grid[coords[slot].to_nd_index()] = Some(tile);
            }
        }

        if !moved {
            return self.clone();
        }

        let mut next = Self {
            size: self.size,
            tiles: grid.into_iter().flatten().collect(),
            score: self.score + gained,
            next_id: self.next_id,
        };
        next.spawn_tile(rng);
        log::debug!(
            "shift {:?} gained {}, score {}, {} tiles",
            direction,
            gained,
            next.score,
            next.tiles.len()
        );
        next
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            size: self.size,
            tiles: self.tiles.clone(),
            score: self.score,
            has_won: self.has_won(),
            has_lost: self.has_lost(),
        }
    }

    fn occupancy(&self) -> Array2<Option<Tile>> {
        let n = usize::from(self.size);
        let mut grid = Array2::default([n, n]);
        for &tile in &self.tiles {
            grid[tile.coords().to_nd_index()] = Some(tile);
        }
        grid
    }

    /// Two draws per spawn: position over the row-major empty cells, then
    /// value (2 with probability 0.9, 4 otherwise).
    fn spawn_tile<R: RandomSource>(&mut self, rng: &mut R) {
        let grid = self.occupancy();
        let mut empty: Vec<Coord2> = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if grid[(row, col).to_nd_index()].is_none() {
                    empty.push((row, col));
                }
            }
        }
        if empty.is_empty() {
            return;
        }

        let slot = ((rng.draw() * empty.len() as f64) as usize).min(empty.len() - 1);
        let value = if rng.draw() < TWO_CHANCE { 2 } else { 4 };
        let (row, col) = empty[slot];
        let id = self.next_id;
        self.next_id += 1;
        self.tiles.push(Tile {
            id,
            value,
            row,
            col,
            just_merged: false,
        });
        log::trace!("spawned {} at ({}, {})", value, row, col);
    }
}

/// Render-ready view of a board, returned by [`Board::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord,
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub has_won: bool,
    pub has_lost: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: Coord, tiles: &[(u32, Coord2)]) -> Board {
        let tiles: Vec<Tile> = tiles
            .iter()
            .enumerate()
            .map(|(i, &(value, (row, col)))| Tile {
                id: i as TileId,
                value,
                row,
                col,
                just_merged: false,
            })
            .collect();
        let next_id = tiles.len() as TileId;
        Board {
            size,
            tiles,
            score: 0,
            next_id,
        }
    }

    #[test]
    fn new_board_spawns_two_tiles_from_the_draw_sequence() {
        let mut rng = FixedSequence::new(&[0.0, 0.0, 0.5, 0.95]);

        let board = Board::new(GridConfig::default(), &mut rng);

        assert_eq!(board.tiles().len(), 2);
        assert_eq!(board.score(), 0);
        assert_eq!(board.tile_at((0, 0)).map(|t| t.value), Some(2));
        // second position draw picks index 7 of the 15 remaining empties
        assert_eq!(board.tile_at((2, 0)).map(|t| t.value), Some(4));
    }

    #[test]
    fn merge_left_combines_pair_scores_and_spawns_once() {
        let board = board_with(4, &[(2, (0, 0)), (2, (0, 1))]);
        let mut rng = FixedSequence::new(&[0.99, 0.0]);

        let next = board.shift(Direction::Left, &mut rng);

        let merged = next.tile_at((0, 0)).copied().unwrap();
        assert_eq!(merged.value, 4);
        assert!(merged.just_merged);
        // merged tile keeps the leading tile's identity
        assert_eq!(merged.id, 0);
        assert_eq!(next.score(), 4);
        assert!(!next.has_won());
        // one merged tile plus exactly one spawned tile
        assert_eq!(next.tiles().len(), 2);
        assert_eq!(next.tile_at((3, 3)).map(|t| t.value), Some(2));
        // the prior snapshot is untouched
        assert_eq!(board.tiles().len(), 2);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn three_equal_tiles_merge_only_once() {
        let board = board_with(4, &[(2, (0, 0)), (2, (0, 1)), (2, (0, 2))]);
        let mut rng = FixedSequence::new(&[0.99, 0.0]);

        let next = board.shift(Direction::Left, &mut rng);

        assert_eq!(next.tile_at((0, 0)).map(|t| t.value), Some(4));
        assert_eq!(next.tile_at((0, 1)).map(|t| t.value), Some(2));
        // the trailing survivor is the third original tile, slid into place
        assert_eq!(next.tile_at((0, 1)).map(|t| t.id), Some(2));
        assert_eq!(next.score(), 4);
    }

    #[test]
    fn two_pairs_in_one_lane_both_merge() {
        let board = board_with(4, &[(2, (0, 0)), (2, (0, 1)), (4, (0, 2)), (4, (0, 3))]);
        let mut rng = FixedSequence::new(&[0.99, 0.0]);

        let next = board.shift(Direction::Left, &mut rng);

        assert_eq!(next.tile_at((0, 0)).map(|t| t.value), Some(4));
        assert_eq!(next.tile_at((0, 1)).map(|t| t.value), Some(8));
        assert_eq!(next.score(), 12);
    }

    #[test]
    fn merged_tiles_do_not_merge_again_within_the_same_shift() {
        // [4, 2, 2] -> [4, 4], never [8]
        let board = board_with(4, &[(4, (0, 0)), (2, (0, 1)), (2, (0, 2))]);
        let mut rng = FixedSequence::new(&[0.99, 0.0]);

        let next = board.shift(Direction::Left, &mut rng);

        assert_eq!(next.tile_at((0, 0)).map(|t| t.value), Some(4));
        assert_eq!(next.tile_at((0, 1)).map(|t| t.value), Some(4));
        assert_eq!(next.score(), 4);
    }

    #[test]
    fn vertical_lanes_merge_toward_the_leading_edge() {
        let board = board_with(4, &[(2, (0, 0)), (2, (1, 0))]);
        let mut rng = FixedSequence::new(&[0.0, 0.0]);

        let next = board.shift(Direction::Down, &mut rng);

        assert_eq!(next.tile_at((3, 0)).map(|t| t.value), Some(4));
        assert_eq!(next.score(), 4);
    }

    #[test]
    fn slid_tiles_keep_their_identity() {
        let board = board_with(4, &[(2, (1, 3))]);
        let mut rng = FixedSequence::new(&[0.99, 0.0]);

        let next = board.shift(Direction::Left, &mut rng);

        let slid = next.tile_at((1, 0)).copied().unwrap();
        assert_eq!(slid.id, 0);
        assert_eq!(slid.value, 2);
        assert!(!slid.just_merged);
    }

    #[test]
    fn ineffective_shift_is_the_identity_and_spawns_nothing() {
        let board = board_with(4, &[(2, (0, 2)), (4, (0, 3))]);
        let mut rng = FixedSequence::new(&[0.0, 0.0]);

        let once = board.shift(Direction::Right, &mut rng);
        let twice = once.shift(Direction::Right, &mut rng);

        assert_eq!(once, board);
        assert_eq!(twice, board);
        assert_eq!(twice.tiles().len(), 2);
        assert_eq!(twice.score(), 0);
    }

    #[test]
    fn win_is_reported_at_the_threshold_value() {
        let board = board_with(4, &[(WIN_VALUE, (2, 2))]);

        assert!(board.has_won());
        assert!(!board_with(4, &[(1024, (2, 2))]).has_won());
    }

    #[test]
    fn loss_requires_a_full_grid_with_no_adjacent_pair() {
        let stuck = board_with(2, &[(2, (0, 0)), (4, (0, 1)), (8, (1, 0)), (16, (1, 1))]);
        let mergeable = board_with(2, &[(2, (0, 0)), (2, (0, 1)), (8, (1, 0)), (16, (1, 1))]);
        let sparse = board_with(2, &[(2, (0, 0)), (4, (0, 1)), (8, (1, 0))]);

        assert!(stuck.has_lost());
        assert!(!mergeable.has_lost());
        assert!(!sparse.has_lost());
    }

    #[test]
    fn shifts_preserve_power_of_two_values_and_monotone_score() {
        let mut rng = SeededRandom::from_seed(1234);
        let mut board = Board::new(GridConfig::default(), &mut rng);
        let mut score = board.score();

        for step in 0..200 {
            let direction = Direction::ALL[step % 4];
            let next = board.shift(direction, &mut rng);

            assert!(next.score() >= score);
            for tile in next.tiles() {
                assert!(tile.value >= 2);
                assert!(tile.value.is_power_of_two());
            }
            if next == board {
                assert_eq!(next.tiles().len(), board.tiles().len());
            }

            score = next.score();
            board = next;
        }
    }

    #[test]
    fn snapshot_mirrors_the_board() {
        let board = board_with(4, &[(2, (0, 0)), (2048, (3, 3))]);

        let snapshot = board.snapshot();

        assert_eq!(snapshot.size, 4);
        assert_eq!(snapshot.score, 0);
        assert!(snapshot.has_won);
        assert!(!snapshot.has_lost);
        assert_eq!(snapshot.tiles.len(), 2);
    }
}
