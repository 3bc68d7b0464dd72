//! Typed reasons for refusing a move.
//!
//! Fallible operations return [`anyhow::Result`]; a [`Rejection`] is carried
//! inside the error so that callers can tell the failure categories apart:
//!
//! ```
//! use lancer::chess::game::Game;
//! use lancer::chess::core::Color;
//! use lancer::chess::rejection::Rejection;
//!
//! let mut game = Game::new();
//! let error = game.play("e2-e5", Color::White).unwrap_err();
//! assert!(matches!(
//!     error.downcast_ref::<Rejection>(),
//!     Some(Rejection::Illegal(_))
//! ));
//! ```

use std::fmt;

/// Category of a refused move together with a human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The input does not match any notation shape. Nothing has been looked up
    /// on the board yet.
    Syntax(String),
    /// The notation refers to a piece that is not there: wrong kind, wrong
    /// color, an empty cell or a piece that can not be moved by notation.
    Reference(String),
    /// The piece exists but the move breaks the rules: unreachable
    /// destination, uncapturable target or a king left in check.
    Illegal(String),
    /// A promotion has to be resolved before (or instead of) this action.
    PendingPromotion(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(reason) => write!(f, "malformed move notation: {reason}"),
            Self::Reference(reason) => write!(f, "no such piece: {reason}"),
            Self::Illegal(reason) => write!(f, "illegal move: {reason}"),
            Self::PendingPromotion(reason) => write!(f, "promotion: {reason}"),
        }
    }
}

impl std::error::Error for Rejection {}
