use broadside::{AiPlayer, Game, GameConfig, GameState};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded game advanced by a random mix of attacks, computer moves, and
/// ability uses.
fn played_game(seed: u64) -> Game {
    let mut game = Game::with_seed(GameConfig::default(), seed).unwrap();
    game.start_new_game(&mut AiPlayer::new()).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
    let turns = rng.random_range(0..150);
    for _ in 0..turns {
        if game.is_game_over() {
            break;
        }
        match rng.random_range(0..10) {
            0 => {
                game.use_player_ability(&mut AiPlayer::new()).unwrap();
            }
            1..=5 => {
                let (x, y) = (rng.random_range(0..10), rng.random_range(0..10));
                game.make_player_attack(x, y).unwrap();
            }
            _ => {
                game.make_computer_move().unwrap();
            }
        }
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Saving then loading reproduces the whole game state.
    #[test]
    fn game_state_text_roundtrip(seed in any::<u64>()) {
        let game = played_game(seed);
        let state = game.state();
        let text = state.to_string();
        let decoded: GameState = text.parse().unwrap();
        prop_assert_eq!(&decoded, &state);

        let restored = Game::from_state(decoded, SmallRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(restored.state(), state);
        prop_assert_eq!(restored.state().to_string(), text);
    }
}
