//! # Single-observer information set MCTS
//!
//! One search builds a fresh tree of the deciding player's information sets. Every iteration
//! samples a determinization of the hidden information, walks the tree restricted to the moves
//! legal in that determinization, adds at most one node, plays out to the turn horizon and
//! pushes the reward back up the path. The tree only models the observer's own turn: once a
//! move hands over the turn in the sampled determinization, the path ends there. Whether that
//! happens can depend on hidden information, so it is decided again on every iteration.

use std::marker::PhantomData;
use std::time::{Duration, Instant};
use log::{debug, error, trace};
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha20Rng;
use crate::config::SearchConfig;
use crate::determinization::Determinization;
use crate::error::SearchError;
use crate::history::InfosetKey;
use crate::info::NodeId;
use crate::policy::ucb_select;
use crate::rollout::simulate;
use crate::stats::SearchStatistics;
use crate::tree::{InfosetTree, Partition};
use crate::utils::*;

// ---------- Budget ----------
/// When to stop iterating. Checked between iterations only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    pub time: Option<Duration>,
    pub iterations: Option<u32>,
}

impl Budget {
    pub fn from_config(config: &SearchConfig) -> Self {
        Budget { time: Some(config.move_time()), iterations: config.max_iterations }
    }
    pub fn iterations(n: u32) -> Self { Budget { time: None, iterations: Some(n) } }
    pub fn time(limit: Duration) -> Self { Budget { time: Some(limit), iterations: None } }

    pub fn exhausted(&self, elapsed: Duration, iterations: u32) -> bool {
        self.time.is_some_and(|t| elapsed >= t) || self.iterations.is_some_and(|n| iterations >= n)
    }
}

/// One node on the path of the current iteration, with everything that only holds for this determinization
#[derive(Debug)]
struct Step<G: Game> {
    node: NodeId,
    /// Running abstract history; must equal the node's identity
    history: InfosetKey,
    det: Determinization<G>,
    /// The observer stopped acting here in this determinization
    horizon: bool,
    partition: Partition<G::Move>,
}

/// Whether the tree stops after `mv` led to `det`
fn is_horizon<G: Game>(det: &Determinization<G>, mv: &G::Move, observer: Player) -> bool {
    !det.is_terminal() && (mv.ends_turn() || det.active_player() != observer)
}

pub(crate) fn fatal(e: SearchError) -> SearchError {
    error!("{e}");
    e
}

// ---------- Searcher ----------
pub struct Ismcts<G: Game, H: Heuristic<G>, F: MoveFilter<G> = KeepAll> {
    config: SearchConfig,
    heuristic: H,
    filter: F,
    rng: ChaCha20Rng,
    last: SearchStatistics,
    _game: PhantomData<G>,
}

impl<G: Game, H: Heuristic<G>> Ismcts<G, H, KeepAll> {
    pub fn new(config: SearchConfig, heuristic: H) -> Self {
        Self::with_filter(config, heuristic, KeepAll)
    }
}

impl<G: Game, H: Heuristic<G>, F: MoveFilter<G>> Ismcts<G, H, F> {
    pub fn with_filter(config: SearchConfig, heuristic: H, filter: F) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Ismcts { config, heuristic, filter, rng, last: SearchStatistics::default(), _game: PhantomData }
    }

    #[inline] pub fn config(&self) -> &SearchConfig { &self.config }
    #[inline] pub fn heuristic(&self) -> &H { &self.heuristic }
    /// Statistics of the most recent move computation
    #[inline] pub fn statistics(&self) -> &SearchStatistics { &self.last }

    /// Pick a move for the player to act in `game`, within the configured budget
    pub fn choose_move(&mut self, game: &G, possible_moves: &[G::Move]) -> Result<G::Move, SearchError> {
        let budget = Budget::from_config(&self.config);
        self.choose_move_within(game, possible_moves, budget)
    }

    pub fn choose_move_within(&mut self, game: &G, possible_moves: &[G::Move], budget: Budget) -> Result<G::Move, SearchError> {
        self.last = SearchStatistics::default();
        match possible_moves {
            [] => Err(fatal(SearchError::NoLegalMoves)),
            [only] => Ok(only.clone()),
            _ => {
                let tree = self.search(game, possible_moves, budget)?;
                match self.best_move(&tree, possible_moves) {
                    Some(mv) => Ok(mv),
                    None => {
                        debug!("No root statistics after {} iterations, playing a random move", self.last.iterations);
                        self.random_move(possible_moves)
                    }
                }
            }
        }
    }

    /// Uniformly random legal move, for when there is no time to search
    pub fn random_move(&mut self, possible_moves: &[G::Move]) -> Result<G::Move, SearchError> {
        possible_moves.choose(&mut self.rng).cloned().ok_or_else(|| fatal(SearchError::NoLegalMoves))
    }

    /// Build the information set tree for the player to act in `game`
    pub fn search(&mut self, game: &G, possible_moves: &[G::Move], budget: Budget) -> Result<InfosetTree<G::Move>, SearchError> {
        let start = Instant::now();
        let observer = game.active_player();
        let mut tree = InfosetTree::new();
        let mut iterations = 0;
        let mut max_depth = 0;
        while !budget.exhausted(start.elapsed(), iterations) {
            let det = Determinization::sample_root(game, observer, possible_moves, &self.filter, &mut self.rng);
            let depth = self.iterate(&mut tree, observer, det)?;
            max_depth = max_depth.max(depth);
            iterations += 1;
        }
        let shape = tree.stats();
        self.last = SearchStatistics {
            iterations,
            max_depth,
            root_width: shape.root_width,
            tree_size: shape.total_nodes,
            elapsed: start.elapsed(),
        };
        debug!(
            "{:?}: {} iterations in {:?}, {} nodes, root width {}, depth {}",
            observer, iterations, self.last.elapsed, shape.total_nodes, shape.root_width, max_depth
        );
        Ok(tree)
    }

    /// The root legal move matching the best root child
    pub fn best_move(&self, tree: &InfosetTree<G::Move>, possible_moves: &[G::Move]) -> Option<G::Move> {
        let best = tree.get(self.config.final_choice.best_child(tree, tree.root())?);
        let key = best.history.last()?;
        possible_moves
            .iter()
            .find(|mv| mv.isomorphism() == *key)
            .cloned()
            .or_else(|| best.first_move.clone())
    }

    // ---------- One iteration ----------
    /// Select, expand, simulate, backpropagate. Returns the depth reached
    fn iterate(&mut self, tree: &mut InfosetTree<G::Move>, observer: Player, det: Determinization<G>) -> Result<usize, SearchError> {
        let root = tree.root();
        let partition = tree.partition(root, det.moves());
        let mut path = vec![Step { node: root, history: InfosetKey::root(), det, horizon: false, partition }];

        // Selection
        loop {
            let leaf = &path[path.len() - 1];
            if Self::stops_selection(leaf) { break; }
            let Some(pick) = ucb_select(tree, &leaf.partition.compatible, self.config.exploration) else { break };
            let (child, mv) = leaf.partition.compatible[pick].clone();
            let history = leaf.history.extend(mv.isomorphism());
            tree.verify_membership(child, &history).map_err(fatal)?;
            let det = leaf.det.apply(&mv);
            let horizon = is_horizon(&det, &mv, observer);
            let partition = if horizon {
                tree.get_mut(child).boundary = true;
                Partition::default()
            } else {
                tree.partition(child, det.moves())
            };
            path.push(Step { node: child, history, det, horizon, partition });
        }

        // Expansion
        let last = path.len() - 1;
        if !path[last].partition.untried.is_empty() && !Self::stops_expansion(&path[last]) {
            let child = self.expand(tree, &mut path[last], observer)?;
            path.push(child);
        }

        let reward = self.evaluate(&path, observer);
        Self::backpropagate(tree, &path, reward);
        trace!("{:?} -> {:.4}", path[path.len() - 1].history, reward);
        Ok(path.len() - 1)
    }

    #[inline]
    fn stops_expansion(step: &Step<G>) -> bool {
        step.det.is_terminal() || step.horizon
    }

    #[inline]
    fn stops_selection(step: &Step<G>) -> bool {
        Self::stops_expansion(step) || !step.partition.is_fully_expanded()
    }

    /// Add one child for a random untried move of `leaf`
    fn expand(&mut self, tree: &mut InfosetTree<G::Move>, leaf: &mut Step<G>, observer: Player) -> Result<Step<G>, SearchError> {
        let Some(mv) = leaf.partition.untried.choose(&mut self.rng).cloned() else {
            return Err(fatal(SearchError::NothingToExpand { node: leaf.node }));
        };
        let det = leaf.det.apply(&mv);
        let horizon = is_horizon(&det, &mv, observer);
        let child = tree.add_child(leaf.node, mv.clone(), horizon).map_err(fatal)?;

        let edge = mv.isomorphism();
        leaf.partition.untried.retain(|m| m.isomorphism() != edge);
        leaf.partition.compatible.push((child, mv));
        Ok(Step { node: child, history: leaf.history.extend(edge), det, horizon, partition: Partition::default() })
    }

    /// Playout value of the end of the path. Where the turn was handed over, the position before the handover is valued
    fn evaluate(&mut self, path: &[Step<G>], observer: Player) -> Reward {
        let leaf = &path[path.len() - 1];
        if leaf.horizon && path.len() >= 2 {
            return self.heuristic.evaluate(path[path.len() - 2].det.state(), observer);
        }
        simulate(&leaf.det, observer, &self.heuristic, self.config.rollout, self.config.horizon(), &mut self.rng)
    }

    fn backpropagate(tree: &mut InfosetTree<G::Move>, path: &[Step<G>], reward: Reward) {
        let last = path.len() - 1;
        for (i, step) in path.iter().enumerate() {
            tree.get_mut(step.node).record(reward);
            if i == last { continue; }
            for (child, _) in &step.partition.compatible {
                tree.get_mut(*child).mark_available();
            }
        }
    }
}
