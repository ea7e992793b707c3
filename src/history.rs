//! # Move histories and the information-set equivalence
//!
//! A node of the search tree is identified by the moves that led to it from the root,
//! compared up to *isomorphism*: two moves are the same if they are the same kind of
//! command on the same kind of card, even when the concrete card instances differ.
//! Comparing whole hidden-information states for observer-indistinguishability is never
//! attempted; the abstracted move history is the only identity a node has.
//!
//! Moves describe themselves with a [`MoveKey`] built from the closed set of [`Facet`]s.
//! Because the oracle reduces to key equality it is reflexive, symmetric and transitive
//! for free, and the keys can index a hash map.

use std::fmt::{Debug, Formatter};
use crate::utils::MoveI;

// ---------- Facets ----------
/// The kinds of things a move can refer to, each compared by its observable attributes only
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    /// What the move does (play, buy, end turn, ...)
    Command(u8),
    /// A card by its common id, never its unique instance id
    Card(u32),
    /// A card on the board with state of its own
    Agent { card: u32, activated: bool, hp: i32 },
    /// A pending effect
    Effect { kind: u16, amount: i32 },
    /// A plain number (a count, a choice index into a public list)
    Amount(i64),
    /// Marks the start of an unordered group of the given length
    Group(u32),
}

// ---------- Move keys ----------
/// Abstract identity of one move (an infoset edge)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MoveKey { facets: Vec<Facet> }

impl MoveKey {
    pub fn command(command: u8) -> Self {
        MoveKey { facets: vec![Facet::Command(command)] }
    }

    pub fn with(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// Append facets whose order carries no meaning (e.g. a set of chosen cards)
    pub fn with_unordered(mut self, facets: impl IntoIterator<Item = Facet>) -> Self {
        let mut group: Vec<Facet> = facets.into_iter().collect();
        group.sort();
        self.facets.push(Facet::Group(group.len() as u32));
        self.facets.extend(group);
        self
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

impl Debug for MoveKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.facets)
    }
}

// ---------- Infoset keys ----------
/// Abstract move history from the root: the identity of an information set node
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct InfosetKey(Vec<MoveKey>);

impl InfosetKey {
    pub fn root() -> Self {
        InfosetKey(vec![])
    }
    /// Key of the child reached by one more move
    pub fn extend(&self, edge: MoveKey) -> Self {
        let mut moves = self.0.clone();
        moves.push(edge);
        InfosetKey(moves)
    }
    pub fn from_moves<'a, M: MoveI + 'a>(moves: impl IntoIterator<Item = &'a M>) -> Self {
        InfosetKey(moves.into_iter().map(|m| m.isomorphism()).collect())
    }
    #[inline] pub fn len(&self) -> usize { self.0.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn edges(&self) -> &[MoveKey] { &self.0 }
    pub fn last(&self) -> Option<&MoveKey> { self.0.last() }
}

impl Debug for InfosetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Infoset{:?}", self.0)
    }
}

// ---------- The oracle ----------
/// Two moves are the same kind of action
#[inline]
pub fn isomorphic<M: MoveI>(a: &M, b: &M) -> bool {
    a.isomorphism() == b.isomorphism()
}

/// Two abstract histories name the same information set
#[inline]
pub fn same_information_set(a: &InfosetKey, b: &InfosetKey) -> bool {
    a == b
}

/// Same as [`same_information_set`] for concrete move paths: equal length, pairwise isomorphic
pub fn same_history<M: MoveI>(a: &[M], b: &[M]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| isomorphic(x, y))
}
