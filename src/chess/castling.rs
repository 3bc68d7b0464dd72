//! [Castling] legality and execution for both colors and both sides.
//!
//! [Castling]: https://www.chessprogramming.org/Castling

use anyhow::anyhow;

use crate::chess::board::Board;
use crate::chess::check;
use crate::chess::core::{CastlingSide, Cell, Color, PieceKind};
use crate::chess::rejection::Rejection;

/// Cells involved in a castling move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Castle {
    #[allow(missing_docs)]
    pub king_from: Cell,
    #[allow(missing_docs)]
    pub king_to: Cell,
    #[allow(missing_docs)]
    pub rook_from: Cell,
    #[allow(missing_docs)]
    pub rook_to: Cell,
}

/// Checks every castling condition and returns the cells the king and the rook
/// move between.
///
/// # Errors
///
/// [`Rejection::Reference`] when `color` has no king or the king or the rook
/// can not be moved by notation, [`Rejection::Illegal`] when any of the conditions fails: the king or rook
/// has moved, the rook is not on the king's row, the corridor is occupied, the
/// king is in check or would pass through or land on an attacked cell.
pub fn legality(board: &Board, color: Color, side: CastlingSide) -> anyhow::Result<Castle> {
    let illegal = |reason: String| anyhow!(Rejection::Illegal(reason));
    let king_from = board
        .king(color)
        .ok_or_else(|| anyhow!(Rejection::Reference(format!("no {color:?} king to castle with"))))?;
    let reference = |cell: Cell| {
        anyhow!(Rejection::Reference(format!("{side}: the piece on {cell} can not be moved")))
    };
    match board.at(king_from) {
        Some(king) if !king.is_interactive() => return Err(reference(king_from)),
        Some(king) if king.has_moved() => {
            return Err(illegal(format!("{side}: the king has already moved")))
        },
        _ => (),
    }
    let rook_from = Cell::new(color.home_row(), side.rook_col());
    match board.at(rook_from) {
        Some(rook) if rook.color() == color && rook.kind() == PieceKind::Rook => {
            if !rook.is_interactive() {
                return Err(reference(rook_from));
            }
            if rook.has_moved() {
                return Err(illegal(format!("{side}: the rook on {rook_from} has already moved")));
            }
        },
        _ => return Err(illegal(format!("{side}: no {color:?} rook on {rook_from}"))),
    }
    if king_from.row() != rook_from.row() {
        return Err(illegal(format!("{side}: the king is not on the rook's row")));
    }
    let step = side.step();
    // The rook has to end up between the king's source and destination.
    if (rook_from.col() as i8 - king_from.col() as i8) * step <= 2 {
        return Err(illegal(format!("{side}: the rook on {rook_from} is too close")));
    }
    let corridor = std::iter::successors(king_from.offset(0, step), |cell| cell.offset(0, step))
        .take_while(|&cell| cell != rook_from);
    for cell in corridor {
        if !board.is_empty(cell) {
            return Err(illegal(format!("{side}: {cell} is occupied")));
        }
    }
    if check::in_check(board, color) {
        return Err(illegal(format!("{side}: the king is in check")));
    }
    let (Some(transit), Some(king_to)) = (king_from.offset(0, step), king_from.offset(0, 2 * step))
    else {
        return Err(illegal(format!("{side}: the king would leave the board")));
    };
    for cell in [transit, king_to] {
        if check::is_checked(board, color, cell) {
            return Err(illegal(format!("{side}: {cell} is attacked")));
        }
    }
    Ok(Castle {
        king_from,
        king_to,
        rook_from,
        rook_to: transit,
    })
}

#[allow(missing_docs)]
#[must_use]
pub fn is_legal(board: &Board, color: Color, side: CastlingSide) -> bool {
    legality(board, color, side).is_ok()
}

/// Moves the king two cells towards the rook and the rook next to the king on
/// the near side. Both are marked as moved.
///
/// # Errors
///
/// Leaves the board untouched and returns the reason if castling is not legal.
pub fn execute(board: &mut Board, color: Color, side: CastlingSide) -> anyhow::Result<Castle> {
    let castle = legality(board, color, side)?;
    relocate(board, castle);
    Ok(castle)
}

pub(super) fn relocate(board: &mut Board, castle: Castle) {
    debug_assert!(board
        .at(castle.king_from)
        .is_some_and(|piece| piece.kind() == PieceKind::King));
    for (from, to) in [
        (castle.king_from, castle.king_to),
        (castle.rook_from, castle.rook_to),
    ] {
        if let Some(piece) = board.take(from) {
            let _ = board.put(to, piece.moved());
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::piece::{PieceConfig, PieceFactory};

    fn cell(coordinate: &str) -> Cell {
        Cell::try_from(coordinate).unwrap()
    }

    fn setup(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().0
    }

    fn rejection(board: &Board, color: Color, side: CastlingSide) -> Rejection {
        legality(board, color, side)
            .unwrap_err()
            .downcast_ref::<Rejection>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn white_queenside() {
        let mut board = setup("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(is_legal(&board, Color::White, CastlingSide::Queenside));
        let castle = execute(&mut board, Color::White, CastlingSide::Queenside).unwrap();
        assert_eq!(
            castle,
            Castle {
                king_from: cell("e1"),
                king_to: cell("c1"),
                rook_from: cell("a1"),
                rook_to: cell("d1"),
            }
        );
        assert_eq!(board.to_string(), "4k3/8/8/8/8/8/8/2KR4");
        assert!(board.at(cell("c1")).unwrap().has_moved());
        assert!(board.at(cell("d1")).unwrap().has_moved());
    }

    #[test]
    fn all_corners() {
        let board = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::Queenside, CastlingSide::Kingside] {
                let mut board = board.clone();
                let castle = execute(&mut board, color, side).unwrap();
                assert_eq!(castle.king_to.row(), color.home_row());
                assert_eq!(castle.king_to.col(), if side == CastlingSide::Kingside { 6 } else { 2 });
                assert_eq!(castle.rook_to.col(), if side == CastlingSide::Kingside { 5 } else { 3 });
            }
        }
        let mut board = board;
        let _ = execute(&mut board, Color::Black, CastlingSide::Kingside).unwrap();
        assert_eq!(board.to_string(), "r4rk1/8/8/8/8/8/8/R3K2R");
    }

    #[test]
    fn moved_pieces() {
        let board = setup("4k3/8/8/8/8/8/8/R3K2R w K - 0 1");
        assert!(is_legal(&board, Color::White, CastlingSide::Kingside));
        assert!(matches!(
            rejection(&board, Color::White, CastlingSide::Queenside),
            Rejection::Illegal(_)
        ));
        let board = setup("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Kingside));
        assert!(!is_legal(&board, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn blocked_corridor() {
        // b1 only has to be empty, not safe.
        let board = setup("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(is_legal(&board, Color::White, CastlingSide::Queenside));
        let board = setup("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Queenside));
        let board = setup("4k3/8/8/8/8/8/8/4K1nR w K - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Kingside));
    }

    #[test]
    fn attacked_cells() {
        // In check.
        let board = setup("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Kingside));
        assert!(!is_legal(&board, Color::White, CastlingSide::Queenside));
        // Transit cell attacked.
        let board = setup("3r2k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Queenside));
        assert!(is_legal(&board, Color::White, CastlingSide::Kingside));
        // Destination attacked.
        let board = setup("6rk/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!is_legal(&board, Color::White, CastlingSide::Kingside));
        assert!(is_legal(&board, Color::White, CastlingSide::Queenside));
    }

    #[test]
    fn missing_king() {
        let board = setup("8/8/8/8/8/8/8/R7 w - - 0 1");
        assert!(matches!(
            rejection(&board, Color::White, CastlingSide::Queenside),
            Rejection::Reference(_)
        ));
    }

    #[test]
    fn frozen_king() {
        let factory = PieceFactory::standard().with_config(
            PieceKind::King,
            PieceConfig {
                capturable: false,
                interactive: false,
            },
        );
        let mut board = Board::from_placement_with("4k3/8/8/8/8/8/8/R3K3", factory).unwrap();
        let before = board.clone();
        assert!(matches!(
            rejection(&board, Color::White, CastlingSide::Queenside),
            Rejection::Reference(_)
        ));
        assert!(execute(&mut board, Color::White, CastlingSide::Queenside).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn failed_castle_keeps_board() {
        let mut board = setup("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
        let before = board.clone();
        assert!(execute(&mut board, Color::White, CastlingSide::Queenside).is_err());
        assert_eq!(board, before);
    }
}
