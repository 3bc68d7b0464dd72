//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::Not;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A single slot of the board addressed by `(row, col)`.
///
/// The board is stored rank-8-first: row 0 is the eighth rank (Black's back
/// rank) and row 7 is the first rank (White's back rank). Columns map to files
/// from left to right.
///
/// ```
/// use lancer::chess::core::Cell;
///
/// let e4 = Cell::try_from("e4").unwrap();
/// assert_eq!((e4.row(), e4.col()), (4, 4));
/// assert_eq!(Cell::new(7, 0).to_string(), "a1");
/// assert_eq!(Cell::new(0, 7).to_string(), "h8");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Creates a cell from coordinates that are known to be on the board.
    ///
    /// # Panics
    ///
    /// Both coordinates have to be within 0..[`BOARD_WIDTH`] range.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < BOARD_WIDTH && col < BOARD_WIDTH);
        Self { row, col }
    }

    /// Returns true if both coordinates lie on the board.
    #[must_use]
    pub const fn is_inbound(row: i8, col: i8) -> bool {
        0 <= row && row < BOARD_WIDTH as i8 && 0 <= col && col < BOARD_WIDTH as i8
    }

    /// Creates a cell from signed coordinates, returning [`None`] when they
    /// fall outside the board.
    #[must_use]
    pub const fn from_coords(row: i8, col: i8) -> Option<Self> {
        if Self::is_inbound(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Row-major index of the cell: `row * BOARD_WIDTH + col`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.row * BOARD_WIDTH + self.col
    }

    /// Returns the cell displaced by the given number of rows and columns or
    /// [`None`] if it would leave the board.
    #[must_use]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::from_coords(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    /// Returns the neighbouring cell in a given direction.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }

    /// Iterates over all cells in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_WIDTH)
            .cartesian_product(0..BOARD_WIDTH)
            .map(|(row, col)| Self::new(row, col))
    }
}

impl TryFrom<u8> for Cell {
    type Error = anyhow::Error;

    /// Creates a cell given its row-major index.
    ///
    /// # Errors
    ///
    /// If given index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(index: u8) -> anyhow::Result<Self> {
        if index >= BOARD_SIZE {
            bail!("cell index should be in 0..BOARD_SIZE, got {index}");
        }
        Ok(Self::new(index / BOARD_WIDTH, index % BOARD_WIDTH))
    }
}

impl TryFrom<&str> for Cell {
    type Error = anyhow::Error;

    /// Parses a coordinate: file `a`-`h` followed by rank `1`-`8`.
    fn try_from(coordinate: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = coordinate.chars().collect_tuple() else {
            bail!(
                "coordinate should be two-char, got '{coordinate}' with {} chars",
                coordinate.chars().count()
            );
        };
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::new(row, col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.col) as char)?;
        f.write_char((b'8' - self.row) as char)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row of the king and rooks in the standard setup.
    #[must_use]
    pub const fn home_row(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Row the pawns start on.
    #[must_use]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Farthest row from this side: pawns reaching it promote.
    #[must_use]
    pub const fn promotion_row(self) -> u8 {
        self.opponent().home_row()
    }

    /// Row a pawn has to stand on to capture en passant. It is adjacent to the
    /// midline on the opponent's half of the board.
    #[must_use]
    pub const fn en_passant_row(self) -> u8 {
        match self {
            Self::White => 3,
            Self::Black => 4,
        }
    }

    /// Direction of pawn pushes.
    #[must_use]
    pub const fn forward(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }

    /// Diagonal directions of pawn captures.
    #[must_use]
    pub const fn forward_diagonals(self) -> [Direction; 2] {
        match self {
            Self::White => [Direction::UpLeft, Direction::UpRight],
            Self::Black => [Direction::DownLeft, Direction::DownRight],
        }
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Letter used in move notation. Pawns do not have one.
    #[must_use]
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            Self::Pawn => None,
            Self::Rook => Some('R'),
            Self::Knight => Some('N'),
            Self::Bishop => Some('B'),
            Self::Queen => Some('Q'),
            Self::King => Some('K'),
        }
    }

    /// Parses the optional piece letter of the move notation: absence of the
    /// letter means a pawn.
    #[must_use]
    pub const fn from_notation_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Self::Rook),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    #[must_use]
    pub(super) const fn index(self) -> usize {
        match self {
            Self::Pawn => 0,
            Self::Rook => 1,
            Self::Knight => 2,
            Self::Bishop => 3,
            Self::Queen => 4,
            Self::King => 5,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Rook => Self::Rook,
            Promotion::Knight => Self::Knight,
            Promotion::Bishop => Self::Bishop,
            Promotion::Queen => Self::Queen,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::Pawn => 'p',
            Self::Rook => 'r',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Queen => 'q',
            Self::King => 'k',
        })
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(letter: char) -> anyhow::Result<Self> {
        match letter {
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"RNBQ\", got '{letter}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
        })
    }
}

/// Castling moves the king two cells towards one of its rooks: queenside
/// (long, O-O-O, towards column 0) or kingside (short, O-O, towards column 7).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum CastlingSide {
    Queenside,
    Kingside,
}

impl CastlingSide {
    /// Column of the corner rook taking part in castling.
    #[must_use]
    pub const fn rook_col(self) -> u8 {
        match self {
            Self::Queenside => 0,
            Self::Kingside => BOARD_WIDTH - 1,
        }
    }

    /// Horizontal direction of the king walk.
    #[must_use]
    pub const fn step(self) -> i8 {
        match self {
            Self::Queenside => -1,
            Self::Kingside => 1,
        }
    }
}

impl fmt::Display for CastlingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match &self {
            Self::Queenside => "O-O-O",
            Self::Kingside => "O-O",
        })
    }
}

/// Directions on the board from a perspective of White player: "up" moves
/// towards row 0 (the eighth rank).
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// Rook lines.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    /// Bishop lines.
    pub const DIAGONAL: [Self; 4] = [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];
    /// Queen and king lines.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
    ];

    /// `(row, col)` step of a single move in this direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::Up => (-1, 0),
            Self::UpRight => (-1, 1),
            Self::Right => (0, 1),
            Self::Left => (0, -1),
            Self::DownLeft => (1, -1),
            Self::Down => (1, 0),
            Self::DownRight => (1, 1),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::DownLeft => Self::UpRight,
            Self::Down => Self::Up,
            Self::DownRight => Self::UpLeft,
        }
    }
}
