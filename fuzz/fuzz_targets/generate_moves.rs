#![no_main]
use itertools::Itertools;
use lancer::chess::board::Board;
use lancer::chess::moves::{self, MoveDescription};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok((board, turn)) = Board::from_fen(input) else {
        return;
    };
    let Ok(shakmaty_setup) = input.parse::<shakmaty::fen::Fen>() else {
        return;
    };
    // shakmaty rejects impossible positions that the board happily accepts.
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard) else {
        return;
    };
    assert_eq!(
        moves::legal_moves(&board, turn)
            .iter()
            .map(MoveDescription::to_uci)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>(),
        "{input}"
    );
});
