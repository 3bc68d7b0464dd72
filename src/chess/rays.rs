//! Geometry shared by all pieces: sliding rays and knight leaps.
//!
//! These are pure functions of the source cell, the board and a step bound.
//! They do not know which piece they are computing for, except that "enemy"
//! is always relative to the piece standing on the source cell.

use crate::chess::board::Board;
use crate::chess::cellset::CellSet;
use crate::chess::core::{Cell, Direction, BOARD_WIDTH};

/// Longest possible ray: from one edge of the board to the other.
pub const DEFAULT_BOUND: u8 = BOARD_WIDTH - 1;

/// Rank/file offsets of a knight leap.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Steps from `from` in `direction` collecting consecutive empty cells. Stops
/// before the first occupied cell, after `bound` steps or at the edge.
#[must_use]
pub fn ray_moves(from: Cell, board: &Board, direction: Direction, bound: u8) -> CellSet {
    let mut result = CellSet::empty();
    let mut current = from;
    for _ in 0..bound {
        match current.shift(direction) {
            Some(next) if board.is_empty(next) => {
                result.insert(next);
                current = next;
            },
            _ => break,
        }
    }
    result
}

/// First occupied cell in `direction` within `bound` steps if it holds an enemy
/// of the piece on `from`. A friendly occupant also ends the ray.
#[must_use]
pub fn ray_capture(from: Cell, board: &Board, direction: Direction, bound: u8) -> Option<Cell> {
    let mut current = from;
    for _ in 0..bound {
        current = current.shift(direction)?;
        if !board.is_empty(current) {
            return board.is_enemy(from, current).then_some(current);
        }
    }
    None
}

/// Union of [`ray_moves`] over several directions.
#[must_use]
pub fn slide_moves(from: Cell, board: &Board, directions: &[Direction], bound: u8) -> CellSet {
    directions
        .iter()
        .fold(CellSet::empty(), |acc, &direction| {
            acc | ray_moves(from, board, direction, bound)
        })
}

/// All cells [`ray_capture`] yields over several directions.
#[must_use]
pub fn slide_captures(from: Cell, board: &Board, directions: &[Direction], bound: u8) -> CellSet {
    directions
        .iter()
        .filter_map(|&direction| ray_capture(from, board, direction, bound))
        .collect()
}

fn leaps(from: Cell) -> impl Iterator<Item = Cell> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(move |&(d_row, d_col)| from.offset(d_row, d_col))
}

/// Knight destinations that are on the board and empty.
#[must_use]
pub fn leap_moves(from: Cell, board: &Board) -> CellSet {
    leaps(from).filter(|&to| board.is_empty(to)).collect()
}

/// Knight destinations that hold an enemy.
#[must_use]
pub fn leap_captures(from: Cell, board: &Board) -> CellSet {
    leaps(from).filter(|&to| board.is_enemy(from, to)).collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cell(coordinate: &str) -> Cell {
        Cell::try_from(coordinate).unwrap()
    }

    fn cells(set: CellSet) -> Vec<String> {
        set.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn open_rays() {
        let board = Board::from_placement("8/8/8/8/3B4/8/8/8").unwrap();
        let from = cell("d4");
        assert_eq!(
            cells(ray_moves(from, &board, Direction::UpRight, DEFAULT_BOUND)),
            vec!["h8", "g7", "f6", "e5"]
        );
        assert_eq!(
            cells(ray_moves(from, &board, Direction::Left, DEFAULT_BOUND)),
            vec!["a4", "b4", "c4"]
        );
        assert_eq!(
            cells(ray_moves(from, &board, Direction::Down, 2)),
            vec!["d3", "d2"]
        );
        assert_eq!(ray_moves(from, &board, Direction::Down, 0), CellSet::empty());
        assert_eq!(
            slide_moves(from, &board, &Direction::ALL, DEFAULT_BOUND).len(),
            27
        );
        assert_eq!(ray_capture(from, &board, Direction::Up, DEFAULT_BOUND), None);
    }

    #[test]
    fn blocked_rays() {
        // Friendly pawn on b6, enemy knight on f6, enemy rook out of reach on d8
        // behind an enemy pawn on d7.
        let board = Board::from_placement("3r4/3p4/1P3n2/8/3Q4/8/8/8").unwrap();
        let from = cell("d4");
        assert_eq!(
            cells(ray_moves(from, &board, Direction::UpLeft, DEFAULT_BOUND)),
            vec!["c5"]
        );
        assert_eq!(ray_capture(from, &board, Direction::UpLeft, DEFAULT_BOUND), None);
        assert_eq!(
            ray_capture(from, &board, Direction::UpRight, DEFAULT_BOUND),
            Some(cell("f6"))
        );
        assert_eq!(
            ray_capture(from, &board, Direction::Up, DEFAULT_BOUND),
            Some(cell("d7"))
        );
        // The bound applies to captures as well.
        assert_eq!(ray_capture(from, &board, Direction::Up, 2), None);
        assert_eq!(
            cells(slide_captures(from, &board, &Direction::ALL, DEFAULT_BOUND)),
            vec!["d7", "f6"]
        );
    }

    #[test]
    fn empty_source() {
        let board = Board::from_placement("8/8/8/3p4/8/8/8/8").unwrap();
        assert_eq!(
            slide_captures(cell("d1"), &board, &Direction::ALL, DEFAULT_BOUND),
            CellSet::empty()
        );
        assert_eq!(leap_captures(cell("c3"), &board), CellSet::empty());
    }

    #[test]
    fn knight() {
        let board = Board::from_placement("8/8/8/8/8/1p6/2P5/N7").unwrap();
        let from = cell("a1");
        assert_eq!(cells(leap_moves(from, &board)), Vec::<String>::new());
        assert_eq!(cells(leap_captures(from, &board)), vec!["b3"]);

        let board = Board::from_placement("8/8/8/8/3N4/8/8/8").unwrap();
        assert_eq!(
            cells(leap_moves(cell("d4"), &board)),
            vec!["c6", "e6", "b5", "f5", "b3", "f3", "c2", "e2"]
        );
    }
}
