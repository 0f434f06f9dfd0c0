//! Walk-generation algorithms.
//!
//! - [`alias`] - O(1) sampling from fixed discrete distributions
//! - [`transition`] - node2vec second-order transition tables
//! - [`random_walk`] - biased walk corpus generation

pub mod alias;
pub mod random_walk;
pub mod transition;
