use std::time::Duration;
use log::info;

/// What a single move computation did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStatistics {
    pub iterations: u32,
    /// Longest tree path walked in any iteration
    pub max_depth: usize,
    /// Root children when the search ended
    pub root_width: usize,
    pub tree_size: usize,
    pub elapsed: Duration,
}

// ---------- Session diagnostics ----------
/// Counters accumulated over one game, reset when it ends
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub games: u32,
    pub turns: u32,
    pub moves: u32,
    /// Moves that went through a search (no forced or fallback moves)
    pub searches: u32,
    pub simulations: u64,
    pub timeouts: u32,
    depth_total: u64,
    width_total: u64,
}

impl SessionStats {
    pub fn record_search(&mut self, stats: &SearchStatistics) {
        self.searches += 1;
        self.simulations += stats.iterations as u64;
        self.depth_total += stats.max_depth as u64;
        self.width_total += stats.root_width as u64;
    }

    pub fn average_depth(&self) -> f64 {
        self.depth_total as f64 / self.searches.max(1) as f64
    }

    pub fn average_width(&self) -> f64 {
        self.width_total as f64 / self.searches.max(1) as f64
    }

    pub fn simulations_per_move(&self) -> f64 {
        self.simulations as f64 / self.moves.max(1) as f64
    }

    pub fn simulations_per_turn(&self) -> f64 {
        self.simulations as f64 / self.turns.max(1) as f64
    }

    /// Log the per game summary and start over for the next game
    pub fn finish_game(&mut self, name: &str) {
        self.games += 1;
        info!(
            "{name} game {}: {} turns, {} moves, {} simulations ({:.1}/move, {:.1}/turn), depth {:.2}, root width {:.2}, {} timeouts",
            self.games,
            self.turns,
            self.moves,
            self.simulations,
            self.simulations_per_move(),
            self.simulations_per_turn(),
            self.average_depth(),
            self.average_width(),
            self.timeouts,
        );
        *self = SessionStats { games: self.games, ..SessionStats::default() };
    }
}
