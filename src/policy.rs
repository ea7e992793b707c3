use serde::Deserialize;
use crate::info::{InfosetNode, NodeId};
use crate::tree::InfosetTree;
use crate::utils::*;

// ---------- Final choice ----------
/// Which root statistic decides the move that is actually played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalChoice {
    /// Best single playout seen below the child
    #[default]
    MaxReward,
    /// Most visited child
    MostVisits,
}

impl FinalChoice {
    #[inline]
    fn score<M: MoveI>(self, node: &InfosetNode<M>) -> Reward {
        match self {
            FinalChoice::MaxReward => node.max_reward,
            FinalChoice::MostVisits => node.visits as Reward,
        }
    }

    /// Best child of `node` in creation order; the first one wins ties
    pub fn best_child<M: MoveI>(self, tree: &InfosetTree<M>, node: NodeId) -> Option<NodeId> {
        argmax(tree.get(node).children().iter().map(|&c| (c, self.score(tree.get(c)))))
    }
}

impl std::str::FromStr for FinalChoice {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max_reward" => Ok(FinalChoice::MaxReward),
            "most_visits" => Ok(FinalChoice::MostVisits),
            other => Err(format!("unknown final choice {other}")),
        }
    }
}

// ---------- Tree policy ----------
/// UCB1 over the children compatible with the current determinization, in that move order.
/// Returns the position in `compatible` of the winner; the first one wins ties
pub fn ucb_select<M: MoveI, T>(tree: &InfosetTree<M>, compatible: &[(NodeId, T)], k: f64) -> Option<usize> {
    argmax(compatible.iter().enumerate().map(|(i, (c, _))| (i, tree.get(*c).ucb(k))))
}

/// First item with the strictly largest score
fn argmax<T>(scored: impl Iterator<Item = (T, Reward)>) -> Option<T> {
    let mut best: Option<(T, Reward)> = None;
    for (item, score) in scored {
        let better = match &best { Some((_, top)) => score > *top, None => true };
        if better { best = Some((item, score)); }
    }
    best.map(|(item, _)| item)
}
