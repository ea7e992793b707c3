use rand::Rng;
use crate::utils::*;

// ---------- Determinization ----------
/// One concrete resolution of the hidden information together with the moves legal in it.
/// Immutable: moving forward always builds a new value
#[derive(Debug, Clone)]
pub struct Determinization<G: Game> {
    state: G,
    moves: Vec<G::Move>,
}

impl<G: Game> Determinization<G> {
    pub fn new(state: G, moves: Vec<G::Move>) -> Self {
        Determinization { state, moves }
    }

    /// Resample the hidden information of the root position for `observer`.
    /// Every root move is compatible with every seed, so the legal moves are reused (after filtering)
    pub fn sample_root<F: MoveFilter<G>, R: Rng>(
        game: &G,
        observer: Player,
        possible_moves: &[G::Move],
        filter: &F,
        rng: &mut R,
    ) -> Self {
        let seed: Seed = rng.random();
        let state = game.determinize(observer, seed);
        let moves = filter.filter(&state, possible_moves.to_vec());
        Determinization { state, moves }
    }

    /// The determinization reached by playing `mv`
    pub fn apply(&self, mv: &G::Move) -> Self {
        let (state, moves) = self.state.apply(mv);
        Determinization { state, moves }
    }

    #[inline] pub fn state(&self) -> &G { &self.state }
    #[inline] pub fn moves(&self) -> &[G::Move] { &self.moves }
    #[inline] pub fn is_terminal(&self) -> bool { self.state.is_over() }
    #[inline] pub fn active_player(&self) -> Player { self.state.active_player() }
}
