//! Structured move descriptions, their legality and execution.
//!
//! A [`MoveDescription`] is what move notation decodes into and what
//! [`legal_moves`] produces. Legality is always decided against the current
//! board: the piece has to be where the description says, the destination has
//! to be reachable, and a simulation on a copy of the board has to prove that
//! the mover's king is not left in check.

use std::fmt;

use anyhow::anyhow;
use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::castling::{self, Castle};
use crate::chess::check;
use crate::chess::core::{CastlingSide, Cell, Color, PieceKind, Promotion};
use crate::chess::en_passant;
use crate::chess::movegen;
use crate::chess::piece::Piece;
use crate::chess::rejection::Rejection;

/// Upper bound for the number of legal moves in any reachable position is 218.
/// Custom setups may exceed it, so there is some headroom.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity list of moves that lives on the stack.
pub type MoveList = ArrayVec<MoveDescription, MAX_MOVES>;

/// What a move does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Relocation to an empty cell.
    Move,
    /// Relocation onto an enemy piece that is removed.
    Capture,
    /// Pawn capture of the enemy pawn that has just double-stepped past.
    EnPassant,
    /// Pawn reaching the farthest row and turning into another piece.
    Promotion {
        #[allow(missing_docs)]
        target: Promotion,
        /// Whether the destination holds an enemy piece.
        capture: bool,
    },
    #[allow(missing_docs)]
    Castle(CastlingSide),
}

/// A move in terms of cells and pieces. For castling `from` and `to` describe
/// the king.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveDescription {
    kind: MoveKind,
    from: Cell,
    to: Cell,
    piece: PieceKind,
    color: Color,
}

impl MoveDescription {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(kind: MoveKind, from: Cell, to: Cell, piece: PieceKind, color: Color) -> Self {
        Self {
            kind,
            from,
            to,
            piece,
            color,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Cell {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Cell {
        self.to
    }

    /// Kind of the moving piece (the king for castling, the pawn for
    /// promotions).
    #[must_use]
    pub const fn piece(&self) -> PieceKind {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        match self.kind {
            MoveKind::Promotion { target, .. } => Some(target),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castle_side(&self) -> Option<CastlingSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    /// Whether an enemy piece is removed by this move.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::Promotion { capture: true, .. }
        )
    }

    /// Serializes the move in [UCI] format: source, destination and an
    /// optional lowercase promotion letter. Castling is the king's two-cell
    /// step.
    ///
    /// [UCI]: https://www.chessprogramming.org/UCI
    #[must_use]
    pub fn to_uci(&self) -> String {
        match self.promotion() {
            Some(target) => format!("{}{}{}", self.from, self.to, PieceKind::from(target)),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for MoveDescription {
    /// Writes the canonical notation: `e2-e4`, `Nb1-c3`, `Bc4xf7`, `e7-e8=Q`,
    /// `O-O-O`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let MoveKind::Castle(side) = self.kind {
            return write!(f, "{side}");
        }
        if let Some(letter) = self.piece.notation_letter() {
            write!(f, "{letter}")?;
        }
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{separator}{}", self.from, self.to)?;
        if let Some(target) = self.promotion() {
            write!(f, "={target}")?;
        }
        Ok(())
    }
}

fn reference(reason: String) -> anyhow::Error {
    anyhow!(Rejection::Reference(reason))
}

fn illegal(reason: String) -> anyhow::Error {
    anyhow!(Rejection::Illegal(reason))
}

/// Decides whether the described move can be played on the board.
///
/// # Errors
///
/// [`Rejection::Reference`] if the source cell does not hold an interactive
/// piece of the described kind and color, [`Rejection::Illegal`] if the move
/// breaks the rules.
pub fn legality(board: &Board, description: &MoveDescription) -> anyhow::Result<()> {
    let MoveDescription {
        kind,
        from,
        to,
        piece: piece_kind,
        color,
    } = *description;
    let piece = match board.at(from) {
        Some(piece) if piece.color() == color && piece.kind() == piece_kind => piece,
        Some(piece) => {
            return Err(reference(format!(
                "{from} holds '{piece}', not a {color:?} {piece_kind:?}"
            )))
        },
        None => return Err(reference(format!("{from} is empty"))),
    };
    if !piece.is_interactive() {
        return Err(reference(format!("'{piece}' on {from} can not be moved")));
    }
    match kind {
        MoveKind::Move => {
            if !movegen::moves(board, from).contains(to) {
                return Err(illegal(format!("{description}: {to} is not reachable")));
            }
        },
        MoveKind::Capture => capture_legality(board, description)?,
        MoveKind::EnPassant => {
            if piece_kind != PieceKind::Pawn {
                return Err(illegal(format!("{description}: only pawns capture en passant")));
            }
            return en_passant::legality(board, from, to);
        },
        MoveKind::Promotion { capture, .. } => {
            if piece_kind != PieceKind::Pawn {
                return Err(illegal(format!("{description}: only pawns are promoted")));
            }
            if to.row() != color.promotion_row() {
                return Err(illegal(format!("{description}: {to} is not on the last rank")));
            }
            if capture {
                capture_legality(board, description)?;
            } else if !movegen::moves(board, from).contains(to) {
                return Err(illegal(format!("{description}: {to} is not reachable")));
            }
        },
        MoveKind::Castle(side) => {
            let castle = castling::legality(board, color, side)?;
            if castle.king_from != from || castle.king_to != to {
                return Err(illegal(format!(
                    "{description}: the king castles from {} to {}",
                    castle.king_from, castle.king_to
                )));
            }
            return Ok(());
        },
    }
    if !leaves_king_safe(board, description) {
        return Err(illegal(format!("{description}: the king would be left in check")));
    }
    Ok(())
}

fn capture_legality(board: &Board, description: &MoveDescription) -> anyhow::Result<()> {
    let to = description.to;
    if !movegen::captures(board, description.from).contains(to) {
        return Err(illegal(format!("{description}: nothing to capture on {to}")));
    }
    match board.at(to) {
        Some(target) if target.is_capturable() => Ok(()),
        Some(target) => Err(illegal(format!("{description}: '{target}' can not be captured"))),
        None => Err(illegal(format!("{description}: {to} is empty"))),
    }
}

fn leaves_king_safe(board: &Board, description: &MoveDescription) -> bool {
    let mut hypothetical = board.clone();
    let _ = apply(&mut hypothetical, description);
    !check::in_check(&hypothetical, description.color)
}

#[allow(missing_docs)]
#[must_use]
pub fn is_legal(board: &Board, description: &MoveDescription) -> bool {
    legality(board, description).is_ok()
}

/// Plays the move if it is legal and returns the captured piece, if any.
///
/// A pawn arriving at the last row through a plain move or capture stays a
/// pawn: resolving the promotion is up to the caller (see
/// [`crate::chess::game::Game::promote`]).
///
/// # Errors
///
/// Leaves the board untouched and returns the [`Rejection`] otherwise.
pub fn execute(board: &mut Board, description: &MoveDescription) -> anyhow::Result<Option<Piece>> {
    legality(board, description)?;
    Ok(apply(board, description))
}

/// Relocates the pieces without any checks.
pub(super) fn apply(board: &mut Board, description: &MoveDescription) -> Option<Piece> {
    let MoveDescription {
        kind,
        from,
        to,
        color,
        ..
    } = *description;
    match kind {
        MoveKind::Move | MoveKind::Capture => {
            let moving = board.take(from);
            debug_assert!(moving.is_some_and(|piece| piece.color() == color));
            let captured = board.take(to);
            if let Some(mut piece) = moving {
                if piece.kind() == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2 {
                    piece.set_en_passant_target(true);
                }
                let _ = board.put(to, piece.moved());
            }
            captured
        },
        MoveKind::EnPassant => en_passant::capture(board, from, to),
        MoveKind::Promotion { target, .. } => {
            let _ = board.take(from);
            let captured = board.take(to);
            let promoted = board.factory().create(color, target.into()).moved();
            let _ = board.put(to, promoted);
            captured
        },
        MoveKind::Castle(side) => {
            if let Some(rook_to) = from.offset(0, side.step()) {
                castling::relocate(
                    board,
                    Castle {
                        king_from: from,
                        king_to: to,
                        rook_from: Cell::new(from.row(), side.rook_col()),
                        rook_to,
                    },
                );
            }
            None
        },
    }
}

fn push_if_safe(board: &Board, moves: &mut MoveList, description: MoveDescription) {
    if leaves_king_safe(board, &description) {
        moves.push(description);
    }
}

/// Enumerates every legal move of `color`. Pawns reaching the last row are
/// listed once per promotion target.
#[must_use]
pub fn legal_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for (from, piece) in board.pieces(color) {
        if !piece.is_interactive() {
            continue;
        }
        let kind = piece.kind();
        let promotes = |to: Cell| kind == PieceKind::Pawn && to.row() == color.promotion_row();
        let destinations = movegen::moves(board, from).iter().map(|to| (to, false));
        let targets = movegen::captures(board, from)
            .iter()
            .filter(|&to| board.at(to).is_some_and(Piece::is_capturable))
            .map(|to| (to, true));
        for (to, capture) in destinations.chain(targets) {
            if promotes(to) {
                for target in Promotion::iter() {
                    let promotion = MoveKind::Promotion { target, capture };
                    push_if_safe(
                        board,
                        &mut moves,
                        MoveDescription::new(promotion, from, to, kind, color),
                    );
                }
            } else {
                let plain = if capture {
                    MoveKind::Capture
                } else {
                    MoveKind::Move
                };
                push_if_safe(board, &mut moves, MoveDescription::new(plain, from, to, kind, color));
            }
        }
        match kind {
            PieceKind::Pawn => {
                for to in en_passant::targets(board, from) {
                    moves.push(MoveDescription::new(MoveKind::EnPassant, from, to, kind, color));
                }
            },
            PieceKind::King => {
                for side in CastlingSide::iter() {
                    if let Ok(castle) = castling::legality(board, color, side) {
                        if castle.king_from == from {
                            moves.push(MoveDescription::new(
                                MoveKind::Castle(side),
                                from,
                                castle.king_to,
                                kind,
                                color,
                            ));
                        }
                    }
                }
            },
            _ => (),
        }
    }
    moves
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::game::Game;
    use crate::chess::piece::{PieceConfig, PieceFactory};

    fn cell(coordinate: &str) -> Cell {
        Cell::try_from(coordinate).unwrap()
    }

    fn setup(fen: &str) -> (Board, Color) {
        Board::from_fen(fen).unwrap()
    }

    fn describe(kind: MoveKind, from: &str, to: &str, piece: PieceKind, color: Color) -> MoveDescription {
        MoveDescription::new(kind, cell(from), cell(to), piece, color)
    }

    fn rejection(board: &Board, description: &MoveDescription) -> Rejection {
        legality(board, description)
            .unwrap_err()
            .downcast_ref::<Rejection>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn canonical_notation() {
        let white = Color::White;
        assert_eq!(
            describe(MoveKind::Move, "e2", "e4", PieceKind::Pawn, white).to_string(),
            "e2-e4"
        );
        assert_eq!(
            describe(MoveKind::Move, "b1", "c3", PieceKind::Knight, white).to_string(),
            "Nb1-c3"
        );
        assert_eq!(
            describe(MoveKind::Capture, "c4", "f7", PieceKind::Bishop, white).to_string(),
            "Bc4xf7"
        );
        assert_eq!(
            describe(MoveKind::EnPassant, "e5", "d6", PieceKind::Pawn, white).to_string(),
            "e5xd6"
        );
        let promotion = MoveKind::Promotion {
            target: Promotion::Queen,
            capture: false,
        };
        let description = describe(promotion, "e7", "e8", PieceKind::Pawn, white);
        assert_eq!(description.to_string(), "e7-e8=Q");
        assert_eq!(description.to_uci(), "e7e8q");
        let promotion = MoveKind::Promotion {
            target: Promotion::Knight,
            capture: true,
        };
        assert_eq!(
            describe(promotion, "d7", "c8", PieceKind::Pawn, white).to_string(),
            "d7xc8=N"
        );
        let castle = describe(
            MoveKind::Castle(CastlingSide::Kingside),
            "e1",
            "g1",
            PieceKind::King,
            white,
        );
        assert_eq!(castle.to_string(), "O-O");
        assert_eq!(castle.to_uci(), "e1g1");
        assert_eq!(castle.castle_side(), Some(CastlingSide::Kingside));
        assert!(!castle.is_capture());
    }

    #[test]
    fn starting_moves() {
        let board = Board::starting();
        let moves = legal_moves(&board, Color::White);
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|m| m.kind() == MoveKind::Move));
        assert_eq!(legal_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn pawn_double_step() {
        let mut board = Board::starting();
        assert!(is_legal(
            &board,
            &describe(MoveKind::Move, "a2", "a4", PieceKind::Pawn, Color::White)
        ));
        let too_far = describe(MoveKind::Move, "a2", "a5", PieceKind::Pawn, Color::White);
        assert!(matches!(rejection(&board, &too_far), Rejection::Illegal(_)));
        let captured = execute(
            &mut board,
            &describe(MoveKind::Move, "a2", "a4", PieceKind::Pawn, Color::White),
        )
        .unwrap();
        assert_eq!(captured, None);
        let pawn = board.at(cell("a4")).unwrap();
        assert!(pawn.has_moved());
        assert!(pawn.is_en_passant_target());
        assert_eq!(
            board.to_string(),
            "rnbqkbnr/pppppppp/8/8/P7/8/1PPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn wrong_references() {
        let board = Board::starting();
        let empty = describe(MoveKind::Move, "e4", "e5", PieceKind::Pawn, Color::White);
        assert!(matches!(rejection(&board, &empty), Rejection::Reference(_)));
        let wrong_kind = describe(MoveKind::Move, "b1", "c3", PieceKind::Bishop, Color::White);
        assert!(matches!(rejection(&board, &wrong_kind), Rejection::Reference(_)));
        let wrong_color = describe(MoveKind::Move, "b8", "c6", PieceKind::Knight, Color::White);
        assert!(matches!(rejection(&board, &wrong_color), Rejection::Reference(_)));
    }

    #[test]
    fn captures() {
        let (mut board, _) = setup("4k3/8/5p2/8/8/8/8/1B2K3 w - - 0 1");
        let quiet = describe(MoveKind::Move, "b1", "f5", PieceKind::Bishop, Color::White);
        assert!(is_legal(&board, &quiet));
        let onto_piece = describe(MoveKind::Move, "b1", "f6", PieceKind::Bishop, Color::White);
        assert!(!is_legal(&board, &onto_piece));
        let capture = describe(MoveKind::Capture, "b1", "f6", PieceKind::Bishop, Color::White);
        assert!(!is_legal(&board, &capture));
        let capture = describe(MoveKind::Capture, "b1", "g6", PieceKind::Bishop, Color::White);
        assert!(!is_legal(&board, &capture));

        let (mut board2, _) = setup("4k3/8/6p1/8/8/8/8/1B2K3 w - - 0 1");
        let capture = describe(MoveKind::Capture, "b1", "g6", PieceKind::Bishop, Color::White);
        let captured = execute(&mut board2, &capture).unwrap().unwrap();
        assert_eq!(captured, Piece::new(Color::Black, PieceKind::Pawn).moved());
        assert_eq!(board2.to_string(), "4k3/8/6B1/8/8/8/8/4K3");
        // Failed moves keep the board intact.
        let before = board.clone();
        assert!(execute(&mut board, &capture).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn kings_are_not_captured() {
        // Black is in check: the capture of the king is still not a move.
        let (board, _) = setup("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
        let capture = describe(MoveKind::Capture, "e1", "e8", PieceKind::Rook, Color::White);
        assert!(matches!(rejection(&board, &capture), Rejection::Illegal(_)));
        assert!(legal_moves(&board, Color::White)
            .iter()
            .all(|m| m.to() != cell("e8")));
    }

    #[test]
    fn pins() {
        let (board, _) = setup("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let pinned = describe(MoveKind::Move, "e2", "c3", PieceKind::Knight, Color::White);
        assert!(matches!(rejection(&board, &pinned), Rejection::Illegal(_)));
        // Only king moves remain.
        assert!(legal_moves(&board, Color::White)
            .iter()
            .all(|m| m.piece() == PieceKind::King));
    }

    #[test]
    fn check_evasions() {
        let (board, turn) = setup("4k3/8/8/8/8/8/3q4/R3K3 w - - 0 1");
        let moves = legal_moves(&board, turn);
        let mut uci = moves.iter().map(MoveDescription::to_uci).collect::<Vec<_>>();
        uci.sort();
        assert_eq!(uci, vec!["e1d2", "e1f1"]);
    }

    #[test]
    fn promotions() {
        let (mut board, turn) = setup("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = legal_moves(&board, turn);
        assert_eq!(
            moves
                .iter()
                .filter(|m| m.promotion().is_some())
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "a7-a8=Q", "a7-a8=R", "a7-a8=B", "a7-a8=N", "a7xb8=Q", "a7xb8=R", "a7xb8=B",
                "a7xb8=N"
            ]
        );
        let underpromotion = MoveKind::Promotion {
            target: Promotion::Knight,
            capture: true,
        };
        let captured = execute(
            &mut board,
            &describe(underpromotion, "a7", "b8", PieceKind::Pawn, Color::White),
        )
        .unwrap();
        assert_eq!(captured.map(Piece::kind), Some(PieceKind::Knight));
        assert_eq!(board.to_string(), "1N2k3/8/8/8/8/8/8/4K3");
        // Promotion is only possible on the last rank.
        let early = MoveKind::Promotion {
            target: Promotion::Queen,
            capture: false,
        };
        assert!(!is_legal(
            &Board::starting(),
            &describe(early, "e2", "e3", PieceKind::Pawn, Color::White)
        ));
    }

    #[test]
    fn plain_move_to_last_rank() {
        let (mut board, _) = setup("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let description = describe(MoveKind::Move, "a7", "a8", PieceKind::Pawn, Color::White);
        let _ = execute(&mut board, &description).unwrap();
        assert_eq!(board.at(cell("a8")).map(Piece::kind), Some(PieceKind::Pawn));
    }

    #[test]
    fn castling_moves() {
        let (board, turn) = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles = legal_moves(&board, turn)
            .iter()
            .filter_map(MoveDescription::castle_side)
            .collect::<Vec<_>>();
        assert_eq!(castles, vec![CastlingSide::Queenside, CastlingSide::Kingside]);
        let wrong_destination = describe(
            MoveKind::Castle(CastlingSide::Kingside),
            "e1",
            "h1",
            PieceKind::King,
            Color::White,
        );
        assert!(!is_legal(&board, &wrong_destination));
        let mut board = board;
        let _ = execute(
            &mut board,
            &describe(MoveKind::Castle(CastlingSide::Kingside), "e1", "g1", PieceKind::King, Color::White),
        )
        .unwrap();
        assert_eq!(board.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1");
    }

    #[test]
    fn non_interactive_pieces() {
        let factory = PieceFactory::standard().with_config(
            PieceKind::Rook,
            PieceConfig {
                capturable: true,
                interactive: false,
            },
        );
        let board = Board::from_placement_with("4k3/8/8/8/8/8/8/R3K3", factory).unwrap();
        let rook_move = describe(MoveKind::Move, "a1", "a5", PieceKind::Rook, Color::White);
        assert!(matches!(rejection(&board, &rook_move), Rejection::Reference(_)));
        assert!(legal_moves(&board, Color::White)
            .iter()
            .all(|m| m.piece() == PieceKind::King));
    }

    #[test]
    fn non_interactive_rook_does_not_castle() {
        let factory = PieceFactory::standard().with_config(
            PieceKind::Rook,
            PieceConfig {
                capturable: true,
                interactive: false,
            },
        );
        let board = Board::from_placement_with("4k3/8/8/8/8/8/8/4K2R", factory).unwrap();
        let castle = describe(
            MoveKind::Castle(CastlingSide::Kingside),
            "e1",
            "g1",
            PieceKind::King,
            Color::White,
        );
        assert!(matches!(rejection(&board, &castle), Rejection::Reference(_)));
        assert!(legal_moves(&board, Color::White)
            .iter()
            .all(|m| m.kind() != MoveKind::Castle(CastlingSide::Kingside)));

        let mut game = Game::from_board(board.clone());
        let error = game.play("O-O", Color::White).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Rejection>(),
            Some(Rejection::Reference(_))
        ));
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn uncapturable_pieces() {
        let factory = PieceFactory::standard().with_config(
            PieceKind::Knight,
            PieceConfig {
                capturable: false,
                interactive: true,
            },
        );
        let board = Board::from_placement_with("4k3/8/8/8/n7/8/8/R3K3", factory).unwrap();
        let capture = describe(MoveKind::Capture, "a1", "a4", PieceKind::Rook, Color::White);
        assert!(matches!(rejection(&board, &capture), Rejection::Illegal(_)));
        // The knight still blocks the rook.
        let through = describe(MoveKind::Move, "a1", "a5", PieceKind::Rook, Color::White);
        assert!(!is_legal(&board, &through));
    }
}
