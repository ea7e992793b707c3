use std::collections::HashMap;
use crate::error::SearchError;
use crate::history::InfosetKey;
use crate::info::{InfosetNode, NodeId};
use crate::utils::*;

// ---------- Partition ----------
/// The legal moves of one determinization at one node, split by whether the tree already holds them
#[derive(Debug, Clone)]
pub struct Partition<M> {
    /// Existing children reachable in this determinization, with the concrete move that reaches them
    pub compatible: Vec<(NodeId, M)>,
    /// Moves without a child yet
    pub untried: Vec<M>,
}

impl<M> Partition<M> {
    #[inline] pub fn is_fully_expanded(&self) -> bool { self.untried.is_empty() }
}

impl<M> Default for Partition<M> {
    fn default() -> Self { Partition { compatible: vec![], untried: vec![] } }
}

// ---------- Tree ----------
/// Arena of information set nodes for one move request, indexed by abstract history
#[derive(Debug, Clone)]
pub struct InfosetTree<M: MoveI> {
    nodes: Vec<InfosetNode<M>>,
    index: HashMap<InfosetKey, NodeId>,
}

/// Shape of a finished tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_width: usize,
    pub max_depth: usize,
}

impl<M: MoveI> Default for InfosetTree<M> {
    fn default() -> Self { Self::new() }
}

impl<M: MoveI> InfosetTree<M> {
    pub fn new() -> Self {
        let root = InfosetNode::new_root();
        let mut index = HashMap::new();
        index.insert(root.history.clone(), NodeId(0));
        InfosetTree { nodes: vec![root], index }
    }

    #[inline] pub fn root(&self) -> NodeId { NodeId(0) }
    #[inline] pub fn get(&self, id: NodeId) -> &InfosetNode<M> { &self.nodes[id.index()] }
    #[inline] pub fn get_mut(&mut self, id: NodeId) -> &mut InfosetNode<M> { &mut self.nodes[id.index()] }
    #[inline] pub fn len(&self) -> usize { self.nodes.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn lookup(&self, key: &InfosetKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// The child of `node` reached by a move isomorphic to `mv`, if one was created
    pub fn child_for(&self, node: NodeId, mv: &M) -> Option<NodeId> {
        self.lookup(&self.get(node).history.extend(mv.isomorphism()))
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = &InfosetNode<M>> {
        self.get(node).children().iter().map(move |c| self.get(*c))
    }

    /// Create the child of `parent` reached by `mv`. A second child with the same identity is refused
    pub fn add_child(&mut self, parent: NodeId, mv: M, boundary: bool) -> Result<NodeId, SearchError> {
        let key = self.get(parent).history.extend(mv.isomorphism());
        if self.index.contains_key(&key) {
            return Err(SearchError::DuplicateChild { node: parent, key });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.index.insert(key.clone(), id);
        self.nodes.push(InfosetNode::new_child(parent, key, mv, boundary));
        self.get_mut(parent).push_child(id);
        Ok(id)
    }

    /// Split the legal moves of a determinization at `node` into compatible children and untried moves.
    /// Isomorphic moves collapse onto their first occurrence, which keeps the legal move order
    pub fn partition(&self, node: NodeId, moves: &[M]) -> Partition<M> {
        let history = &self.get(node).history;
        let mut seen = Vec::with_capacity(moves.len());
        let mut partition = Partition { compatible: vec![], untried: vec![] };
        for mv in moves {
            let edge = mv.isomorphism();
            if seen.contains(&edge) { continue; }
            match self.lookup(&history.extend(edge.clone())) {
                Some(child) => partition.compatible.push((child, mv.clone())),
                None => partition.untried.push(mv.clone()),
            }
            seen.push(edge);
        }
        partition
    }

    /// Check that the running history of an iteration names `node`
    pub fn verify_membership(&self, node: NodeId, history: &InfosetKey) -> Result<(), SearchError> {
        let expected = &self.get(node).history;
        if expected == history {
            Ok(())
        } else {
            Err(SearchError::OutsideInformationSet { node, expected: expected.clone(), found: history.clone() })
        }
    }

    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root());
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_width: root.children().len(),
            max_depth: self.nodes.iter().map(|n| n.depth()).max().unwrap_or(0),
        }
    }
}
