#![allow(clippy::type_complexity)]

pub mod utils;
pub mod history;
pub mod determinization;
pub mod info;
pub mod tree;
pub mod policy;
pub mod rollout;
pub mod config;
pub mod error;
pub mod stats;
pub mod ismcts;
pub mod player;
pub mod games;

pub use config::SearchConfig;
pub use error::{ConfigError, SearchError};
pub use ismcts::{Budget, Ismcts};
pub use player::SoIsmctsPlayer;
pub use utils::{Game, Heuristic, KeepAll, MoveFilter, MoveI, Player, Reward};
