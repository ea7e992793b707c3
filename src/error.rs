use thiserror::Error;
use crate::history::InfosetKey;
use crate::info::NodeId;

/// Contract violations inside the search. None of these come from game states:
/// they mean the rules engine or the tree bookkeeping broke an assumption
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Nothing to expand at node {node:?}: every legal move already has a child")]
    NothingToExpand { node: NodeId },

    #[error("Node {node:?} reached outside its information set: node is {expected:?}, path was {found:?}")]
    OutsideInformationSet { node: NodeId, expected: InfosetKey, found: InfosetKey },

    #[error("Node {node:?} already has a child for {key:?}")]
    DuplicateChild { node: NodeId, key: InfosetKey },
}

/// Errors while loading a search configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
