//! Long algebraic move notation.
//!
//! Seven shapes are recognized (`piece` is one of `RNBQK` or nothing for a
//! pawn, `src` and `dst` are coordinates such as `e2`):
//!
//! | Shape                | Syntax                                   |
//! |----------------------|------------------------------------------|
//! | move                 | `{piece}{src}-{dst}`, `{piece}{src}{dst}` |
//! | capture              | `{piece}{src}x{dst}`                     |
//! | en passant           | `{src}x{dst}`                            |
//! | promotion            | `{src}-{dst}={P}`, `{src}{dst}={P}`      |
//! | capturing promotion  | `{src}x{dst}={P}`                        |
//! | queenside castle     | `O-O-O`, `0-0-0`                         |
//! | kingside castle      | `O-O`, `0-0`                             |
//!
//! Pawn captures and en passant share the syntax: the board tells them apart.
//! Decoding produces a [`MoveDescription`] that
//! [`crate::chess::moves::legality`] then checks against the board.

use anyhow::anyhow;

use crate::chess::board::Board;
use crate::chess::core::{CastlingSide, Cell, Color, PieceKind, Promotion};
use crate::chess::moves::{MoveDescription, MoveKind};
use crate::chess::rejection::Rejection;

/// Notation shapes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Shape {
    #[allow(missing_docs)]
    Capture,
    #[allow(missing_docs)]
    EnPassant,
    #[allow(missing_docs)]
    Promotion,
    #[allow(missing_docs)]
    CapturePromotion,
    #[allow(missing_docs)]
    QueensideCastle,
    #[allow(missing_docs)]
    KingsideCastle,
    #[allow(missing_docs)]
    Move,
}

impl Shape {
    /// Syntax check only: the board is not consulted.
    #[must_use]
    pub fn matches(self, input: &str) -> bool {
        match self {
            Self::QueensideCastle => matches!(input, "O-O-O" | "0-0-0"),
            Self::KingsideCastle => matches!(input, "O-O" | "0-0"),
            _ => parse(input).is_some_and(|parsed| parsed.shapes().contains(&self)),
        }
    }
}

/// Syntax validator for a plain move.
#[must_use]
pub fn is_move(input: &str) -> bool {
    Shape::Move.matches(input)
}

/// Syntax validator for a capture.
#[must_use]
pub fn is_capture(input: &str) -> bool {
    Shape::Capture.matches(input)
}

/// Syntax validator for an en passant capture.
#[must_use]
pub fn is_en_passant(input: &str) -> bool {
    Shape::EnPassant.matches(input)
}

/// Syntax validator for a promotion without capture.
#[must_use]
pub fn is_promotion(input: &str) -> bool {
    Shape::Promotion.matches(input)
}

/// Syntax validator for a promotion with capture.
#[must_use]
pub fn is_capture_promotion(input: &str) -> bool {
    Shape::CapturePromotion.matches(input)
}

#[allow(missing_docs)]
#[must_use]
pub fn is_queenside_castle(input: &str) -> bool {
    Shape::QueensideCastle.matches(input)
}

#[allow(missing_docs)]
#[must_use]
pub fn is_kingside_castle(input: &str) -> bool {
    Shape::KingsideCastle.matches(input)
}

/// Pieces of a non-castling notation string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Parsed {
    piece: PieceKind,
    from: Cell,
    capture: bool,
    to: Cell,
    promotion: Option<Promotion>,
}

impl Parsed {
    fn shapes(self) -> &'static [Shape] {
        let pawn = self.piece == PieceKind::Pawn;
        match (self.capture, self.promotion) {
            (false, None) => &[Shape::Move],
            (true, None) if pawn => &[Shape::Capture, Shape::EnPassant],
            (true, None) => &[Shape::Capture],
            (false, Some(_)) if pawn => &[Shape::Promotion],
            (true, Some(_)) if pawn => &[Shape::CapturePromotion],
            (_, Some(_)) => &[],
        }
    }
}

fn parse(input: &str) -> Option<Parsed> {
    let mut rest = input;
    let piece = match rest.chars().next().and_then(PieceKind::from_notation_letter) {
        Some(kind) => {
            rest = &rest[1..];
            kind
        },
        None => PieceKind::Pawn,
    };
    let from = Cell::try_from(rest.get(..2)?).ok()?;
    rest = &rest[2..];
    let capture = match rest.chars().next() {
        Some('-') => {
            rest = &rest[1..];
            false
        },
        Some('x') => {
            rest = &rest[1..];
            true
        },
        _ => false,
    };
    let to = Cell::try_from(rest.get(..2)?).ok()?;
    rest = &rest[2..];
    let promotion = match rest.strip_prefix('=') {
        Some(suffix) => {
            let mut letters = suffix.chars();
            let target = Promotion::try_from(letters.next()?).ok()?;
            rest = letters.as_str();
            Some(target)
        },
        None => None,
    };
    rest.is_empty().then_some(Parsed {
        piece,
        from,
        capture,
        to,
        promotion,
    })
}

fn syntax(input: &str) -> anyhow::Error {
    anyhow!(Rejection::Syntax(format!("'{input}' does not match any move shape")))
}

/// Picks the single shape the input is actionable as.
///
/// The input is parsed once. The only syntactic overlap is a pawn capture: an occupied destination makes it a capture, an
/// empty one makes it en passant.
///
/// # Errors
///
/// [`Rejection::Syntax`] if the input does not match any shape.
pub fn classify(board: &Board, input: &str) -> anyhow::Result<Shape> {
    if is_queenside_castle(input) {
        return Ok(Shape::QueensideCastle);
    }
    if is_kingside_castle(input) {
        return Ok(Shape::KingsideCastle);
    }
    let parsed = parse(input).ok_or_else(|| syntax(input))?;
    match parsed.shapes() {
        [] => Err(syntax(input)),
        [Shape::Capture, Shape::EnPassant] if board.is_empty(parsed.to) => Ok(Shape::EnPassant),
        [shape, ..] => Ok(*shape),
    }
}

/// Decodes the notation into a move of `color` on the given board. The result
/// is not checked for legality yet.
///
/// ```
/// use lancer::chess::board::Board;
/// use lancer::chess::core::Color;
/// use lancer::chess::moves::MoveKind;
/// use lancer::chess::notation;
///
/// let board = Board::starting();
/// let description = notation::decode(&board, Color::White, "Ng1f3").unwrap();
/// assert_eq!(description.kind(), MoveKind::Move);
/// assert_eq!(description.to_string(), "Ng1-f3");
/// ```
///
/// # Errors
///
/// [`Rejection::Syntax`] for malformed input and [`Rejection::Reference`] for
/// castling without a king.
pub fn decode(board: &Board, color: Color, input: &str) -> anyhow::Result<MoveDescription> {
    let shape = classify(board, input)?;
    match shape {
        Shape::QueensideCastle => return decode_castle(board, color, CastlingSide::Queenside),
        Shape::KingsideCastle => return decode_castle(board, color, CastlingSide::Kingside),
        _ => (),
    }
    let Some(parsed) = parse(input) else {
        return Err(syntax(input));
    };
    let kind = match (shape, parsed.promotion) {
        (Shape::Move, None) => MoveKind::Move,
        (Shape::Capture, None) => MoveKind::Capture,
        (Shape::EnPassant, None) => MoveKind::EnPassant,
        (Shape::Promotion | Shape::CapturePromotion, Some(target)) => MoveKind::Promotion {
            target,
            capture: parsed.capture,
        },
        _ => return Err(syntax(input)),
    };
    Ok(MoveDescription::new(
        kind,
        parsed.from,
        parsed.to,
        parsed.piece,
        color,
    ))
}

fn decode_castle(board: &Board, color: Color, side: CastlingSide) -> anyhow::Result<MoveDescription> {
    let king = board
        .king(color)
        .ok_or_else(|| anyhow!(Rejection::Reference(format!("no {color:?} king to castle with"))))?;
    let to = king.offset(0, 2 * side.step()).ok_or_else(|| {
        anyhow!(Rejection::Illegal(format!("{side}: the king would leave the board")))
    })?;
    Ok(MoveDescription::new(
        MoveKind::Castle(side),
        king,
        to,
        PieceKind::King,
        color,
    ))
}

/// Canonical notation of the move. [`decode`] reverses it on the same board.
#[must_use]
pub fn encode(description: &MoveDescription) -> String {
    description.to_string()
}
