//! # Game Implementations
//!
//! Hidden information card games the search can play. Each implements the `Game` trait
//! together with a heuristic and, optionally, a move filter.

pub mod duel;

// Tests
#[cfg(test)]
mod duel_tests;
