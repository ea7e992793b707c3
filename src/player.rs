use std::time::{Duration, Instant};
use log::{debug, warn};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::ismcts::{fatal, Ismcts};
use crate::stats::SessionStats;
use crate::utils::*;

/// A seat at the table driven by SO-ISMCTS: keeps the turn clock and the session counters around the searcher
pub struct SoIsmctsPlayer<G: Game, H: Heuristic<G>, F: MoveFilter<G> = KeepAll> {
    name: String,
    engine: Ismcts<G, H, F>,
    used_in_turn: Duration,
    session: SessionStats,
}

impl<G: Game, H: Heuristic<G>> SoIsmctsPlayer<G, H, KeepAll> {
    pub fn new(name: impl Into<String>, config: SearchConfig, heuristic: H) -> Self {
        Self::from_engine(name, Ismcts::new(config, heuristic))
    }
}

impl<G: Game, H: Heuristic<G>, F: MoveFilter<G>> SoIsmctsPlayer<G, H, F> {
    pub fn from_engine(name: impl Into<String>, engine: Ismcts<G, H, F>) -> Self {
        SoIsmctsPlayer { name: name.into(), engine, used_in_turn: Duration::ZERO, session: SessionStats::default() }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }
    #[inline] pub fn engine(&self) -> &Ismcts<G, H, F> { &self.engine }
    #[inline] pub fn session(&self) -> &SessionStats { &self.session }
    #[inline] pub fn used_in_turn(&self) -> Duration { self.used_in_turn }

    /// Pick the next move of the current turn
    pub fn play(&mut self, game: &G, possible_moves: &[G::Move]) -> Result<G::Move, SearchError> {
        let start = Instant::now();
        let mv = match possible_moves {
            [] => return Err(fatal(SearchError::NoLegalMoves)),
            [only] if only.ends_turn() => only.clone(),
            _ if self.out_of_time() => {
                self.session.timeouts += 1;
                warn!("{}: turn clock at {:?}, playing a random move", self.name, self.used_in_turn);
                self.engine.random_move(possible_moves)?
            }
            _ => {
                let mv = self.engine.choose_move(game, possible_moves)?;
                let stats = self.engine.statistics();
                if stats.iterations > 0 {
                    self.session.record_search(stats);
                }
                mv
            }
        };
        self.used_in_turn += start.elapsed();
        self.session.moves += 1;
        if mv.ends_turn() {
            debug!("{}: turn {} took {:?}", self.name, self.session.turns, self.used_in_turn);
            self.session.turns += 1;
            self.used_in_turn = Duration::ZERO;
        }
        Ok(mv)
    }

    /// Another full search would overrun the turn
    fn out_of_time(&self) -> bool {
        let config = self.engine.config();
        self.used_in_turn + config.move_time() >= config.turn_timeout()
    }

    /// Log the session summary and get ready for the next game
    pub fn game_end(&mut self) {
        self.session.finish_game(&self.name);
        self.used_in_turn = Duration::ZERO;
    }
}
