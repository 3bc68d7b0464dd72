//! Pieces and the [`PieceFactory`] that instantiates them.
//!
//! Every piece is a plain value: its kind decides how it moves (see
//! [`crate::chess::movegen`]) and a couple of flags carry the state that some
//! rules depend on.

use std::fmt;

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::core::{Color, PieceKind};

/// Behavior switches of a piece kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceConfig {
    /// Whether an enemy can remove this piece by capturing it. Kings are never
    /// capturable: the game ends by checkmate instead.
    pub capturable: bool,
    /// Whether move notation is allowed to move this piece. A non-interactive
    /// piece still occupies its cell and blocks rays.
    pub interactive: bool,
}

impl PieceConfig {
    /// Configuration of the standard chess rules.
    #[must_use]
    pub const fn standard(kind: PieceKind) -> Self {
        Self {
            capturable: !matches!(kind, PieceKind::King),
            interactive: true,
        }
    }
}

/// Creates pieces according to a per-kind [`PieceConfig`]. The board keeps the
/// factory it was built with and reuses it whenever a pawn is promoted.
///
/// ```
/// use lancer::chess::core::{Color, PieceKind};
/// use lancer::chess::piece::{PieceConfig, PieceFactory};
///
/// let factory = PieceFactory::standard().with_config(
///     PieceKind::Rook,
///     PieceConfig {
///         capturable: true,
///         interactive: false,
///     },
/// );
/// assert!(!factory.create(Color::White, PieceKind::Rook).is_interactive());
/// assert!(!factory.create(Color::Black, PieceKind::King).is_capturable());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceFactory {
    configs: [PieceConfig; 6],
}

impl PieceFactory {
    /// Standard rules for every kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut configs = [PieceConfig::standard(PieceKind::Pawn); 6];
        for kind in PieceKind::iter() {
            configs[kind.index()] = PieceConfig::standard(kind);
        }
        Self { configs }
    }

    /// Overrides the configuration of a single kind.
    #[must_use]
    pub fn with_config(mut self, kind: PieceKind, config: PieceConfig) -> Self {
        self.configs[kind.index()] = config;
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self, kind: PieceKind) -> PieceConfig {
        self.configs[kind.index()]
    }

    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn create(&self, color: Color, kind: PieceKind) -> Piece {
        let config = self.config(kind);
        Piece {
            color,
            kind,
            capturable: config.capturable,
            interactive: config.interactive,
            has_moved: false,
            en_passant_target: false,
        }
    }

    /// Creates a piece from its FEN symbol: uppercase for White, lowercase for
    /// Black.
    ///
    /// # Errors
    ///
    /// If the symbol is not one of "PRNBQKprnbqk".
    pub fn from_symbol(&self, symbol: char) -> anyhow::Result<Piece> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => bail!("piece symbol should be within \"PRNBQKprnbqk\", got '{symbol}'"),
        };
        Ok(self.create(color, kind))
    }
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::standard()
    }
}

/// A piece standing on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    capturable: bool,
    interactive: bool,
    has_moved: bool,
    en_passant_target: bool,
}

impl Piece {
    /// Creates a piece with the standard configuration.
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        let config = PieceConfig::standard(kind);
        Self {
            color,
            kind,
            capturable: config.capturable,
            interactive: config.interactive,
            has_moved: false,
            en_passant_target: false,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capturable(self) -> bool {
        self.capturable
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        self.interactive
    }

    /// Kings and rooks lose their castling rights once moved, pawns lose the
    /// double step.
    #[must_use]
    pub const fn has_moved(self) -> bool {
        self.has_moved
    }

    /// True only for a pawn during the ply right after its double step.
    #[must_use]
    pub const fn is_en_passant_target(self) -> bool {
        self.en_passant_target
    }

    /// Returns the same piece with the has-moved flag raised. The flag is never
    /// lowered again.
    #[must_use]
    pub const fn moved(mut self) -> Self {
        self.has_moved = true;
        self
    }

    pub(super) fn set_en_passant_target(&mut self, value: bool) {
        debug_assert!(!value || self.kind == PieceKind::Pawn);
        self.en_passant_target = value;
    }

    /// FEN symbol of the piece.
    #[must_use]
    pub const fn symbol(self) -> char {
        let symbol = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        PieceFactory::standard().from_symbol(symbol)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
