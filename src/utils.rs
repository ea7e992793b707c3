use std::fmt::Debug;
use crate::history::MoveKey;

// ---------- Tune-ables ---------- //
pub const MOVE_TIME_MS: u64 = 300;  // Search budget for a single move
pub const TURN_TIMEOUT_MS: u64 = 29_900;  // Safety ceiling on time spent in one turn
pub const EXPLORATION: f64 = 0.7;  // K in the UCB tree policy
pub const MAX_SIMULATION_TURNS: usize = 0;  // Turn boundaries a playout may cross (0 = own turn only)
pub const MAX_ROLLOUT_MOVES: usize = 500;  // Hard cap on playout length

// ---------- Basic types (renamed for pretty) ---------- //
pub type Reward = f64;
pub type Seed = u64;

/// Two seated players; the observer is whichever one is deciding at the root
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Player { P1, P2 }

impl Player {
    #[inline] pub fn other(self) -> Player {
        match self { Player::P1 => Player::P2, Player::P2 => Player::P1 }
    }
    /// Seat number, for per-player arrays
    #[inline] pub fn index(self) -> usize {
        match self { Player::P1 => 0, Player::P2 => 1 }
    }
}

// ---------- Traits the game must provide ----------
/// Properties we want all game moves to have
pub trait MoveI: Clone + Eq + Debug {
    /// Abstract identity of the move: the same kind of action on the same kind of thing,
    /// ignoring concrete card instances
    fn isomorphism(&self) -> MoveKey;
    /// Whether playing this move hands the turn to the other player
    fn ends_turn(&self) -> bool;
}

/// The rules engine the search runs on top of
pub trait Game: Sized + Clone + Debug {
    type Move: MoveI;

    /// The player whose turn it is
    fn active_player(&self) -> Player;
    /// What moves the active player can make
    fn legal_moves(&self) -> Vec<Self::Move>;
    /// Create a new copy of the game after this move is made
    fn play(&self, mv: &Self::Move) -> Self;
    /// Check if the game is over
    fn is_over(&self) -> bool;
    /// Resolve everything `observer` cannot see (shuffles, hidden hands) from `seed`.
    /// Whatever the observer knows, and the moves currently legal for them, must be untouched
    fn determinize(&self, observer: Player, seed: Seed) -> Self;

    /// Transition plus the moves legal afterwards
    fn apply(&self, mv: &Self::Move) -> (Self, Vec<Self::Move>) {
        let next = self.play(mv);
        let moves = next.legal_moves();
        (next, moves)
    }
}

/// Static evaluation of a position (bigger is better for `observer`). Must also handle finished games
pub trait Heuristic<G: Game> {
    fn evaluate(&self, game: &G, observer: Player) -> Reward;
}

/// Prunes the root branching factor before search
pub trait MoveFilter<G: Game> {
    fn filter(&self, game: &G, moves: Vec<G::Move>) -> Vec<G::Move>;
}

/// Default filter that searches every legal move
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepAll;

impl<G: Game> MoveFilter<G> for KeepAll {
    fn filter(&self, _game: &G, moves: Vec<G::Move>) -> Vec<G::Move> {
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players() {
        assert_eq!(Player::P1.other(), Player::P2);
        assert_eq!(Player::P2.other(), Player::P1);
        assert_eq!(Player::P1.other().other(), Player::P1);
        assert_eq!(Player::P2.index(), 1);
    }
}
