//! [Perft] (*per*formance *t*esting) counts the leaves of the legal move tree.
//! Known node counts for well-studied positions make it the most thorough
//! correctness check of move generation and execution together.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::core::Color;
use crate::chess::moves::{self, MoveDescription};

/// Number of move sequences of length `depth` starting with `color` to move.
///
/// ```
/// use lancer::chess::board::Board;
/// use lancer::chess::core::Color;
/// use lancer::chess::perft::perft;
///
/// assert_eq!(perft(&Board::starting(), Color::White, 2), 400);
/// ```
#[must_use]
pub fn perft(board: &Board, color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = moves::legal_moves(board, color);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|description| perft(&play(board, description), color.opponent(), depth - 1))
        .sum()
}

/// Per-move breakdown of [`perft`], handy for locating a divergence from a
/// reference move generator.
#[must_use]
pub fn divide(board: &Board, color: Color, depth: u8) -> Vec<(MoveDescription, u64)> {
    moves::legal_moves(board, color)
        .into_iter()
        .map(|description| {
            let nodes = perft(
                &play(board, &description),
                color.opponent(),
                depth.saturating_sub(1),
            );
            (description, nodes)
        })
        .collect()
}

fn play(board: &Board, description: &MoveDescription) -> Board {
    let mut next = board.clone();
    let _ = moves::apply(&mut next, description);
    next.expire_en_passant(description.color().opponent());
    next
}
