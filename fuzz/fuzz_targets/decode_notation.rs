#![no_main]
use libfuzzer_sys::fuzz_target;
use lancer::chess::core::Color;
use lancer::chess::game::Game;
use lancer::chess::notation;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut game = Game::new();
    for turn in [Color::White, Color::Black] {
        let before = game.clone();
        match game.play(input, turn) {
            // Whatever was accepted has to come back in canonical form.
            Ok(description) => {
                let canonical = notation::encode(&description);
                assert_eq!(
                    notation::decode(before.board(), turn, &canonical).unwrap(),
                    description
                );
            },
            Err(_) => assert_eq!(game, before),
        }
    }
});
