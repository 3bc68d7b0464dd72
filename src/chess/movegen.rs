//! Per-piece move and capture generation.
//!
//! "Pseudo" sets follow the movement pattern of the piece only. The king is
//! the only piece whose destinations are filtered right here: it never steps
//! onto a cell the [check oracle](crate::chess::check::is_checked) reports as
//! attacked. Whether a move of any other piece exposes its own king is decided
//! by [`crate::chess::moves::legality`].

use crate::chess::board::Board;
use crate::chess::cellset::CellSet;
use crate::chess::check;
use crate::chess::core::{Cell, Direction, PieceKind};
use crate::chess::rays::{self, DEFAULT_BOUND};

/// Empty cells the piece standing on `from` could move to following its
/// movement pattern. Empty for an empty cell.
#[must_use]
pub fn pseudo_moves(board: &Board, from: Cell) -> CellSet {
    let Some(piece) = board.at(from) else {
        return CellSet::empty();
    };
    match piece.kind() {
        PieceKind::Pawn => {
            let bound = if piece.has_moved() { 1 } else { 2 };
            rays::ray_moves(from, board, piece.color().forward(), bound)
        },
        PieceKind::Rook => rays::slide_moves(from, board, &Direction::ORTHOGONAL, DEFAULT_BOUND),
        PieceKind::Knight => rays::leap_moves(from, board),
        PieceKind::Bishop => rays::slide_moves(from, board, &Direction::DIAGONAL, DEFAULT_BOUND),
        PieceKind::Queen => rays::slide_moves(from, board, &Direction::ALL, DEFAULT_BOUND),
        PieceKind::King => rays::slide_moves(from, board, &Direction::ALL, 1),
    }
}

/// Enemy-occupied cells the piece standing on `from` attacks. The capturable
/// flag of the targets is not taken into account: an attacked king is what
/// check detection looks for.
#[must_use]
pub fn pseudo_captures(board: &Board, from: Cell) -> CellSet {
    let Some(piece) = board.at(from) else {
        return CellSet::empty();
    };
    match piece.kind() {
        PieceKind::Pawn => {
            rays::slide_captures(from, board, &piece.color().forward_diagonals(), 1)
        },
        PieceKind::Rook => {
            rays::slide_captures(from, board, &Direction::ORTHOGONAL, DEFAULT_BOUND)
        },
        PieceKind::Knight => rays::leap_captures(from, board),
        PieceKind::Bishop => rays::slide_captures(from, board, &Direction::DIAGONAL, DEFAULT_BOUND),
        PieceKind::Queen => rays::slide_captures(from, board, &Direction::ALL, DEFAULT_BOUND),
        PieceKind::King => rays::slide_captures(from, board, &Direction::ALL, 1),
    }
}

/// [`pseudo_moves`] with king destinations restricted to safe cells.
#[must_use]
pub fn moves(board: &Board, from: Cell) -> CellSet {
    king_filter(board, from, pseudo_moves(board, from))
}

/// [`pseudo_captures`] with king destinations restricted to safe cells.
#[must_use]
pub fn captures(board: &Board, from: Cell) -> CellSet {
    king_filter(board, from, pseudo_captures(board, from))
}

fn king_filter(board: &Board, from: Cell, destinations: CellSet) -> CellSet {
    match board.at(from) {
        Some(piece) if piece.kind() == PieceKind::King => destinations
            .iter()
            .filter(|&to| !check::is_checked(board, piece.color(), to))
            .collect(),
        _ => destinations,
    }
}
