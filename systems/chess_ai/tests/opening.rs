use quest_arcade_chess::{legal_moves, ChessMatch, ChessStatus, Color, Square};
use quest_arcade_system_chess_ai::{centre_distance, ChessAi};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn square(text: &str) -> Square {
    text.parse().expect("valid square")
}

#[test]
fn reply_to_king_pawn_opening_heads_for_the_centre() {
    for seed in 0..64 {
        let mut game = ChessMatch::new();
        let _ = game.play(square("e2"), square("e4")).expect("e2e4 is legal");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let reply = ChessAi::new()
            .select_move(game.board(), Color::Black, &mut rng)
            .expect("black has moves");

        assert!(legal_moves(game.board(), Color::Black).contains(&reply));
        assert_eq!(game.board().piece_at(reply.to), None, "no capture exists");
        // The best quiet key is below 2, so nothing at distance 3 or more can win.
        assert!(
            centre_distance(reply.to) < 3.0,
            "seed {seed} chose {reply}"
        );

        let _ = game.play_ai(reply.from, reply.to).expect("selected moves are valid");
        assert_eq!(game.status(), ChessStatus::PlayerTurn);
    }
}

#[test]
fn same_seed_same_game() {
    let play = |seed| {
        let mut game = ChessMatch::new();
        let mut ai = ChessAi::new();
        let mut white = ChaCha8Rng::seed_from_u64(seed);
        let mut black = ChaCha8Rng::seed_from_u64(seed + 1);
        let mut log = Vec::new();

        for _ in 0..40 {
            let (color, rng) = match game.status() {
                ChessStatus::PlayerTurn => (Color::White, &mut white),
                ChessStatus::AiTurn => (Color::Black, &mut black),
                ChessStatus::PlayerWins | ChessStatus::AiWins => break,
            };
            let Some(choice) = ai.select_move(game.board(), color, rng) else {
                let _ = game.declare_no_legal_move();
                break;
            };
            let _ = game
                .play_as(color, choice.from, choice.to)
                .expect("selected moves are valid");
            log.push(choice.to_string());
        }
        log
    };

    assert_eq!(play(5), play(5));
}
