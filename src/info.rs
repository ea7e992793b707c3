use crate::history::InfosetKey;
use crate::utils::*;

// ---------- Node handles ----------
/// Index into the tree's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline] pub fn index(self) -> usize { self.0 as usize }
}

// ---------- Info (an infoset node) ----------
/// Durable data for one information set of the observer: its identity and the search statistics.
/// Nothing that depends on the determinization of the current iteration lives here
#[derive(Debug, Clone)]
pub struct InfosetNode<M: MoveI> {
    pub parent: Option<NodeId>,
    /// Abstract move history from the root (the node's identity)
    pub history: InfosetKey,
    /// Concrete move that created this node, under the determinization of that iteration
    pub first_move: Option<M>,
    /// Was a turn boundary in at least one determinization. Diagnostic only: the search
    /// decides the horizon from the determinization of each iteration
    pub boundary: bool,
    pub visits: u32,
    pub total_reward: Reward,
    pub max_reward: Reward,
    /// How often this node could have been chosen when its parent was visited
    pub availability: u32,
    children: Vec<NodeId>,
}

impl<M: MoveI> InfosetNode<M> {
    pub fn new_root() -> Self {
        Self::new(None, InfosetKey::root(), None, false)
    }

    pub fn new_child(parent: NodeId, history: InfosetKey, mv: M, boundary: bool) -> Self {
        Self::new(Some(parent), history, Some(mv), boundary)
    }

    fn new(parent: Option<NodeId>, history: InfosetKey, first_move: Option<M>, boundary: bool) -> Self {
        InfosetNode {
            parent,
            history,
            first_move,
            boundary,
            visits: 0,
            total_reward: 0.0,
            max_reward: Reward::NEG_INFINITY,
            availability: 0,
            children: vec![],
        }
    }

    /// Mean reward, with the visit count seeded at 1
    #[inline]
    pub fn mean_reward(&self) -> Reward {
        self.total_reward / self.visits.max(1) as Reward
    }

    /// UCB1 with availability in place of the parent visit count.
    /// Counters are seeded at 1 so an unvisited node never divides by zero
    pub fn ucb(&self, k: f64) -> Reward {
        let visits = self.visits.max(1) as Reward;
        let available = self.availability.max(1) as Reward;
        self.mean_reward() + k * (available.ln() / visits).sqrt()
    }

    /// Fold one playout result into the statistics
    pub fn record(&mut self, reward: Reward) {
        self.visits += 1;
        self.total_reward += reward;
        self.max_reward = self.max_reward.max(reward);
        self.availability += 1;
    }

    #[inline] pub fn mark_available(&mut self) { self.availability += 1; }
    #[inline] pub fn children(&self) -> &[NodeId] { &self.children }
    #[inline] pub fn depth(&self) -> usize { self.history.len() }
    #[inline] pub fn is_root(&self) -> bool { self.parent.is_none() }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}
