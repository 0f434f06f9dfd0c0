//! Edge-list input.

mod edgelist;

pub use edgelist::EdgeList;
