use log::{error, info};
use rand::seq::IndexedRandom;
use so_ismcts::games::duel::{Duel, DuelFilter, DuelHeuristic};
use so_ismcts::{Game, Ismcts, Player, SearchConfig, SearchError, SoIsmctsPlayer};

type Bot = SoIsmctsPlayer<Duel, DuelHeuristic, DuelFilter>;

/// One game of the search bot against a uniformly random opponent. Returns the bot's result
fn game_loop(bot: &mut Bot, seat: Player, seed: u64) -> Result<f64, SearchError> {
    let mut game = Duel::new(seed);
    let mut rng = rand::rng();
    while !game.is_over() {
        let moves = game.legal_moves();
        let mv = if game.active_player() == seat {
            bot.play(&game, &moves)?
        } else {
            moves.choose(&mut rng).cloned().ok_or(SearchError::NoLegalMoves)?
        };
        game = game.play(&mv);
    }
    bot.game_end();
    let result = match game.winner() {
        Some(p) if p == seat => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    };
    info!(
        "Seed {seed}: bot as {:?} scored {result} (prestige {} to {}) after {} turns",
        seat,
        game.side(seat).prestige,
        game.side(seat.other()).prestige,
        game.turns()
    );
    Ok(result)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SearchConfig::from_env();
    info!("Search config: {:?}", config);
    let mut bot: Bot = SoIsmctsPlayer::from_engine(
        "so-ismcts",
        Ismcts::with_filter(config, DuelHeuristic::default(), DuelFilter),
    );

    let games = 10;
    let mut reward = 0.0;
    for i in 0..games {
        let seat = if i % 2 == 0 { Player::P1 } else { Player::P2 };
        match game_loop(&mut bot, seat, i) {
            Ok(r) => reward += r,
            Err(e) => {
                error!("Game {i} aborted: {e}");
                return;
            }
        }
    }
    info!("Average result against random play: {:.3}", reward / games as f64);
}
