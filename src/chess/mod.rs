//! Implementation of the chess rules: board model, per-piece move generation,
//! check detection, special moves and the move notation that drives them.

pub mod board;
pub mod castling;
pub mod cellset;
pub mod check;
pub mod core;
pub mod en_passant;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod rays;
pub mod rejection;
