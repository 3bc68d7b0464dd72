//! A game session: the live board plus the state that spans plies.
//!
//! [`Game`] decodes notation, commits legal moves and keeps track of a pawn
//! waiting to be promoted. Turn order is the caller's business: every call
//! states whose move it is.

use anyhow::anyhow;

use crate::chess::board::Board;
use crate::chess::check;
use crate::chess::core::{Cell, Color, PieceKind, Promotion};
use crate::chess::moves::{self, MoveDescription, MoveKind, MoveList};
use crate::chess::notation;
use crate::chess::rejection::Rejection;

/// Outcome of the position from one side's perspective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// The side is not in check and has legal moves.
    Normal,
    /// The king is attacked but can be saved.
    Check,
    #[allow(missing_docs)]
    Checkmate,
    /// No legal moves while not in check: the game is drawn.
    Stalemate,
}

/// Owns the board and the pending promotion.
///
/// ```
/// use lancer::chess::core::Color;
/// use lancer::chess::game::{Game, Status};
///
/// let mut game = Game::new();
/// for (input, turn) in [
///     ("f2-f3", Color::White),
///     ("e7-e5", Color::Black),
///     ("g2-g4", Color::White),
///     ("Qd8-h4", Color::Black),
/// ] {
///     game.play(input, turn).unwrap();
/// }
/// assert_eq!(game.status(Color::White), Status::Checkmate);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    pending_promotion: Option<Cell>,
}

impl Game {
    /// Starts from the standard setup.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Continues from a custom setup.
    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self {
            board,
            pending_promotion: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Cell of the pawn that reached the last rank through a plain move or
    /// capture and still has to be promoted.
    #[must_use]
    pub const fn pending_promotion(&self) -> Option<Cell> {
        self.pending_promotion
    }

    /// Decodes the notation and plays the move for `turn`.
    ///
    /// After the move the en passant flags of the opponent's pawns are
    /// cleared: their chance to be captured that way has passed.
    ///
    /// # Errors
    ///
    /// [`Rejection::PendingPromotion`] while a promotion is unresolved,
    /// otherwise any rejection of [`notation::decode`] or
    /// [`moves::execute`]. The board is left untouched on error.
    pub fn play(&mut self, input: &str, turn: Color) -> anyhow::Result<MoveDescription> {
        if let Some(cell) = self.pending_promotion {
            return Err(anyhow!(Rejection::PendingPromotion(format!(
                "the pawn on {cell} has to be promoted before '{input}'"
            ))));
        }
        let description = notation::decode(&self.board, turn, input)?;
        let _ = moves::execute(&mut self.board, &description)?;
        let reaches_last_row = description.piece() == PieceKind::Pawn
            && description.to().row() == turn.promotion_row();
        if reaches_last_row && matches!(description.kind(), MoveKind::Move | MoveKind::Capture) {
            self.pending_promotion = Some(description.to());
        }
        self.board.expire_en_passant(turn.opponent());
        Ok(description)
    }

    /// [`Game::play`] that only reports success.
    pub fn apply(&mut self, input: &str, turn: Color) -> bool {
        self.play(input, turn).is_ok()
    }

    /// Replaces the pending pawn with a piece of the chosen kind.
    ///
    /// # Errors
    ///
    /// [`Rejection::PendingPromotion`] if there is nothing to promote.
    pub fn promote(&mut self, target: Promotion) -> anyhow::Result<()> {
        let pawn = self
            .pending_promotion
            .and_then(|cell| self.board.at(cell).map(|pawn| (cell, pawn)));
        let Some((cell, pawn)) = pawn else {
            return Err(anyhow!(Rejection::PendingPromotion(
                "there is no pawn waiting for promotion".to_string()
            )));
        };
        let promoted = self.board.factory().create(pawn.color(), target.into()).moved();
        let _ = self.board.put(cell, promoted);
        self.pending_promotion = None;
        Ok(())
    }

    /// All legal moves of `color` on the current board.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> MoveList {
        moves::legal_moves(&self.board, color)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn status(&self, color: Color) -> Status {
        let in_check = check::in_check(&self.board, color);
        let stuck = moves::legal_moves(&self.board, color).is_empty();
        match (in_check, stuck) {
            (true, true) => Status::Checkmate,
            (true, false) => Status::Check,
            (false, true) => Status::Stalemate,
            (false, false) => Status::Normal,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
