//! [En passant] captures.
//!
//! A pawn that has just advanced two cells carries the en passant flag until
//! the opponent's reply completes (see [`Board::expire_en_passant`]). During
//! that ply an enemy pawn standing right next to it may capture it by moving
//! diagonally to the cell it skipped.
//!
//! [En passant]: https://www.chessprogramming.org/En_passant

use anyhow::anyhow;

use crate::chess::board::Board;
use crate::chess::cellset::CellSet;
use crate::chess::check;
use crate::chess::core::{Cell, PieceKind};
use crate::chess::piece::Piece;
use crate::chess::rejection::Rejection;

/// Cell of the pawn removed by an en passant capture from `from` to `to`: the
/// capturer's row, the destination's column.
#[must_use]
pub const fn victim(from: Cell, to: Cell) -> Cell {
    Cell::new(from.row(), to.col())
}

/// Checks that the pawn on `from` can capture en passant landing on `to`.
///
/// # Errors
///
/// [`Rejection::Reference`] if there is no pawn on `from` and
/// [`Rejection::Illegal`] if the capture is not available or would leave the
/// capturer's king in check.
pub fn legality(board: &Board, from: Cell, to: Cell) -> anyhow::Result<()> {
    let illegal = |reason: String| anyhow!(Rejection::Illegal(reason));
    let pawn = match board.at(from) {
        Some(piece) if piece.kind() == PieceKind::Pawn => piece,
        _ => return Err(anyhow!(Rejection::Reference(format!("no pawn on {from}")))),
    };
    let color = pawn.color();
    if from.row() != color.en_passant_row() {
        return Err(illegal(format!("{from}x{to}: the pawn is not on its en passant row")));
    }
    let diagonal = color
        .forward_diagonals()
        .iter()
        .any(|&direction| from.shift(direction) == Some(to));
    if !diagonal {
        return Err(illegal(format!("{from}x{to}: not a forward diagonal")));
    }
    if !board.is_empty(to) {
        return Err(illegal(format!("{from}x{to}: the destination is occupied")));
    }
    let captured = victim(from, to);
    match board.at(captured) {
        Some(piece)
            if piece.color() != color
                && piece.kind() == PieceKind::Pawn
                && piece.is_en_passant_target() =>
        {
            if !piece.is_capturable() {
                return Err(illegal(format!("{from}x{to}: {captured} can not be captured")));
            }
        },
        _ => {
            return Err(illegal(format!(
                "{from}x{to}: no pawn on {captured} that has just advanced two cells"
            )))
        },
    }
    let mut hypothetical = board.clone();
    let _ = capture(&mut hypothetical, from, to);
    if check::in_check(&hypothetical, color) {
        return Err(illegal(format!("{from}x{to}: the king would be left in check")));
    }
    Ok(())
}

#[allow(missing_docs)]
#[must_use]
pub fn is_legal(board: &Board, from: Cell, to: Cell) -> bool {
    legality(board, from, to).is_ok()
}

/// Destinations of all legal en passant captures for the pawn on `from`.
#[must_use]
pub fn targets(board: &Board, from: Cell) -> CellSet {
    let Some(pawn) = board.at(from) else {
        return CellSet::empty();
    };
    pawn.color()
        .forward_diagonals()
        .iter()
        .filter_map(|&direction| from.shift(direction))
        .filter(|&to| is_legal(board, from, to))
        .collect()
}

/// Performs the capture and returns the removed pawn.
///
/// # Errors
///
/// Leaves the board untouched if the capture is not legal.
pub fn execute(board: &mut Board, from: Cell, to: Cell) -> anyhow::Result<Option<Piece>> {
    legality(board, from, to)?;
    Ok(capture(board, from, to))
}

pub(super) fn capture(board: &mut Board, from: Cell, to: Cell) -> Option<Piece> {
    if let Some(pawn) = board.take(from) {
        let _ = board.put(to, pawn.moved());
    }
    board.take(victim(from, to))
}
