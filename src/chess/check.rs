//! Check, checkmate and stalemate detection.

use crate::chess::board::Board;
use crate::chess::cellset::CellSet;
use crate::chess::core::{Cell, Color, PieceKind};
use crate::chess::movegen;
use crate::chess::moves;

/// Reports whether the king of `color` would be in check standing on `cell`.
///
/// The question is answered on a hypothetical copy of the board where the
/// king is moved to `cell` (whatever stood there is replaced). All enemy
/// pieces attack that copy, the enemy king included with its plain one-step
/// reach, so two kings never end up adjacent. When `color` has no king, a
/// fresh one is placed on `cell` for the purpose of the question.
#[must_use]
pub fn is_checked(board: &Board, color: Color, cell: Cell) -> bool {
    let mut hypothetical = board.clone();
    let king = match board.king(color) {
        Some(from) => hypothetical.take(from),
        None => None,
    }
    .unwrap_or_else(|| board.factory().create(color, PieceKind::King));
    let _ = hypothetical.put(cell, king);
    attacked_by(&hypothetical, color.opponent()).contains(cell)
}

/// Union of the capture sets of all pieces of `attacker`.
#[must_use]
pub fn attacked_by(board: &Board, attacker: Color) -> CellSet {
    board
        .pieces(attacker)
        .fold(CellSet::empty(), |acc, (from, _)| {
            acc | movegen::pseudo_captures(board, from)
        })
}

/// Whether the king of `color` is currently in check. A side without a king is
/// never in check.
#[must_use]
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .king(color)
        .is_some_and(|king| is_checked(board, color, king))
}

/// Cells the king of `color` can step to or capture on.
#[must_use]
pub fn king_destinations(board: &Board, color: Color) -> CellSet {
    match board.king(color) {
        Some(king) => movegen::moves(board, king) | movegen::captures(board, king),
        None => CellSet::empty(),
    }
}

/// The king is in check and no legal move gets it out.
#[must_use]
pub fn is_checkmated(board: &Board, color: Color) -> bool {
    in_check(board, color) && moves::legal_moves(board, color).is_empty()
}

/// The king is not in check but the side has no legal move.
#[must_use]
pub fn is_stalemated(board: &Board, color: Color) -> bool {
    !in_check(board, color) && moves::legal_moves(board, color).is_empty()
}
