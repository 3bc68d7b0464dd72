//! Square-centric [`Board`]: an 8x8 grid where each cell holds at most one
//! [`Piece`].
//!
//! The board is the only mutable state of the rules engine. Everything that
//! has to look ahead (check detection, legality of a move) works on a clone,
//! so the live board only changes when a move is committed.

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

use crate::chess::cellset::CellSet;
use crate::chess::core::{CastlingSide, Cell, Color, PieceKind, BOARD_WIDTH};
use crate::chess::piece::{Piece, PieceFactory};

type Grid = [[Option<Piece>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];

/// Placement of all pieces together with the [`PieceFactory`] they were created
/// by.
///
/// ```
/// use lancer::chess::board::Board;
///
/// let board = Board::starting();
/// assert_eq!(
///     board.to_string(),
///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    factory: PieceFactory,
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub fn empty() -> Self {
        Self::empty_with(PieceFactory::standard())
    }

    /// Creates a board without any pieces that will use given factory for
    /// promotions.
    #[must_use]
    pub const fn empty_with(factory: PieceFactory) -> Self {
        Self {
            grid: [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
            factory,
        }
    }

    /// Creates the standard starting array.
    #[must_use]
    pub fn starting() -> Self {
        Self::starting_with(PieceFactory::standard())
    }

    /// Creates the standard starting array with pieces built by the factory.
    #[must_use]
    pub fn starting_with(factory: PieceFactory) -> Self {
        const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty_with(factory);
        for color in [Color::White, Color::Black] {
            for (col, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                let _ = board.put(Cell::new(color.home_row(), col), factory.create(color, kind));
                let _ = board.put(
                    Cell::new(color.pawn_row(), col),
                    factory.create(color, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Creates a board from a custom piece list.
    ///
    /// # Errors
    ///
    /// If two pieces are placed on the same cell.
    pub fn from_pieces(pieces: impl IntoIterator<Item = (Cell, Piece)>) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        for (cell, piece) in pieces {
            if let Some(occupant) = board.put(cell, piece) {
                bail!("cell {cell} is occupied twice: by '{occupant}' and '{piece}'");
            }
        }
        Ok(board)
    }

    /// Parses the piece placement part of [Forsyth-Edwards Notation].
    ///
    /// Without the rest of the FEN the history of the pieces is unknown, so it
    /// is inferred: kings and rooks are considered unmoved, pawns are unmoved
    /// only on their starting row.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_placement(placement: &str) -> anyhow::Result<Self> {
        Self::from_placement_with(placement, PieceFactory::standard())
    }

    /// Same as [`Board::from_placement`] with a custom [`PieceFactory`].
    pub fn from_placement_with(placement: &str, factory: PieceFactory) -> anyhow::Result<Self> {
        let mut board = Self::empty_with(factory);
        let mut row: u8 = 0;
        for rank_fen in placement.split('/') {
            if row == BOARD_WIDTH {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            let mut col: u8 = 0;
            for symbol in rank_fen.chars() {
                if col >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        col += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let mut piece = factory.from_symbol(symbol)?;
                if piece.kind() == PieceKind::Pawn && row != piece.color().pawn_row() {
                    piece = piece.moved();
                }
                let _ = board.put(Cell::new(row, col), piece);
                col += 1;
            }
            if col != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {col}"
                );
            }
            row += 1;
        }
        if row != BOARD_WIDTH {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        Ok(board)
    }

    /// Parses a complete FEN (trailing move counters are optional) and returns
    /// the board together with the side to move.
    ///
    /// Castling rights and the en passant square are translated into piece
    /// state: a side without castling rights has its king marked as moved, a
    /// missing right marks the corresponding corner rook as moved, and the en
    /// passant square flags the pawn that has just advanced past it.
    ///
    /// ```
    /// use lancer::chess::board::Board;
    /// use lancer::chess::core::{Cell, Color};
    ///
    /// let (board, turn) =
    ///     Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3").unwrap();
    /// assert_eq!(turn, Color::Black);
    /// let e4 = Cell::try_from("e4").unwrap();
    /// assert!(board.at(e4).unwrap().is_en_passant_target());
    /// ```
    ///
    /// # Errors
    ///
    /// If any of the fields is malformed or contradicts the placement.
    pub fn from_fen(input: &str) -> anyhow::Result<(Self, Color)> {
        let mut parts = input.trim().split(' ');
        let mut board = match parts.next() {
            Some(placement) => Self::from_placement(placement)?,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let turn = match parts.next() {
            Some(value) => Color::try_from(value)?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        match parts.next() {
            Some(rights) => board.apply_castling_rights(rights)?,
            None => bail!("incorrect FEN: missing castling rights"),
        }
        match parts.next() {
            Some("-") => (),
            Some(value) => board.flag_en_passant(Cell::try_from(value)?, turn)?,
            None => bail!("incorrect FEN: missing en passant square"),
        }
        for counter in parts.by_ref().take(2) {
            if counter.is_empty() || !counter.bytes().all(|c| c.is_ascii_digit()) {
                bail!("move counters can not contain anything other than digits, got '{counter}'");
            }
        }
        match parts.next() {
            None => Ok((board, turn)),
            Some(_) => bail!("trailing symbols are not allowed in FEN"),
        }
    }

    fn apply_castling_rights(&mut self, rights: &str) -> anyhow::Result<()> {
        let mut allowed: Vec<(Color, CastlingSide)> = Vec::new();
        if rights != "-" {
            for symbol in rights.chars() {
                let right = match symbol {
                    'K' => (Color::White, CastlingSide::Kingside),
                    'Q' => (Color::White, CastlingSide::Queenside),
                    'k' => (Color::Black, CastlingSide::Kingside),
                    'q' => (Color::Black, CastlingSide::Queenside),
                    _ => bail!("unknown castling rights: {rights}"),
                };
                if allowed.contains(&right) {
                    bail!("duplicated castling rights: {rights}");
                }
                allowed.push(right);
            }
        }
        for color in [Color::White, Color::Black] {
            if !allowed.iter().any(|(owner, _)| *owner == color) {
                if let Some(king) = self.king(color) {
                    self.mark_moved(king);
                }
            }
            for side in [CastlingSide::Queenside, CastlingSide::Kingside] {
                let corner = Cell::new(color.home_row(), side.rook_col());
                let has_rook = self
                    .at(corner)
                    .is_some_and(|p| p.color() == color && p.kind() == PieceKind::Rook);
                if allowed.contains(&(color, side)) {
                    if !has_rook {
                        bail!("castling rights {rights} require a rook at {corner}");
                    }
                } else if has_rook {
                    self.mark_moved(corner);
                }
            }
        }
        Ok(())
    }

    fn flag_en_passant(&mut self, square: Cell, turn: Color) -> anyhow::Result<()> {
        let mover = turn.opponent();
        let Some(pawn_cell) = square.shift(mover.forward()) else {
            bail!("en passant square {square} is on the edge of the board");
        };
        match self.grid_at_mut(pawn_cell) {
            Some(pawn) if pawn.color() == mover && pawn.kind() == PieceKind::Pawn => {
                *pawn = pawn.moved();
                pawn.set_en_passant_target(true);
                Ok(())
            },
            _ => bail!("en passant square {square} requires a {mover:?} pawn at {pawn_cell}"),
        }
    }

    fn mark_moved(&mut self, cell: Cell) {
        if let Some(piece) = self.grid_at_mut(cell) {
            *piece = piece.moved();
        }
    }

    fn grid_at_mut(&mut self, cell: Cell) -> &mut Option<Piece> {
        &mut self.grid[cell.row() as usize][cell.col() as usize]
    }

    /// The factory used for setups and promotions.
    #[must_use]
    pub const fn factory(&self) -> &PieceFactory {
        &self.factory
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn at(&self, cell: Cell) -> Option<Piece> {
        self.grid[cell.row() as usize][cell.col() as usize]
    }

    /// Places a piece, returning the previous occupant.
    pub fn put(&mut self, cell: Cell, piece: Piece) -> Option<Piece> {
        self.grid_at_mut(cell).replace(piece)
    }

    /// Removes and returns the piece standing on the cell.
    pub fn take(&mut self, cell: Cell) -> Option<Piece> {
        self.grid_at_mut(cell).take()
    }

    /// A cell is empty iff it holds no piece.
    #[must_use]
    pub const fn is_empty(&self, cell: Cell) -> bool {
        self.at(cell).is_none()
    }

    /// Both cells are occupied by pieces of the same color.
    #[must_use]
    pub fn is_ally(&self, lhs: Cell, rhs: Cell) -> bool {
        match (self.at(lhs), self.at(rhs)) {
            (Some(lhs), Some(rhs)) => lhs.color() == rhs.color(),
            _ => false,
        }
    }

    /// Both cells are occupied by pieces of opposing colors.
    #[must_use]
    pub fn is_enemy(&self, lhs: Cell, rhs: Cell) -> bool {
        match (self.at(lhs), self.at(rhs)) {
            (Some(lhs), Some(rhs)) => lhs.color() != rhs.color(),
            _ => false,
        }
    }

    /// Iterates over the pieces of one side in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        Cell::all().filter_map(move |cell| match self.at(cell) {
            Some(piece) if piece.color() == color => Some((cell, piece)),
            _ => None,
        })
    }

    /// Cells occupied by the pieces of one side.
    #[must_use]
    pub fn occupancy(&self, color: Color) -> CellSet {
        self.pieces(color).map(|(cell, _)| cell).collect()
    }

    /// Location of the king. The first one is returned if a custom setup has
    /// more than one.
    #[must_use]
    pub fn king(&self, color: Color) -> Option<Cell> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(cell, _)| cell)
    }

    /// Clears the en passant flag of all pawns of given color. Called once the
    /// opponent has replied to their double step.
    pub fn expire_en_passant(&mut self, color: Color) {
        for cell in Cell::all() {
            if let Some(piece) = self.grid_at_mut(cell) {
                if piece.color() == color {
                    piece.set_en_passant_target(false);
                }
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    /// Prints the board in FEN piece placement format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            let mut empty_cells = 0u8;
            for col in 0..BOARD_WIDTH {
                match self.at(Cell::new(row, col)) {
                    Some(piece) => {
                        if empty_cells != 0 {
                            write!(f, "{empty_cells}")?;
                            empty_cells = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_cells += 1,
                }
            }
            if empty_cells != 0 {
                write!(f, "{empty_cells}")?;
            }
            if row != BOARD_WIDTH - 1 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format: '.' for empty cells, FEN symbol for
    /// pieces, the eighth rank on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.grid
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|slot| slot.map_or('.', Piece::symbol))
                        .join(SQUARE_SEPARATOR)
                })
                .join(LINE_SEPARATOR)
        )
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
