// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

//! Graph storage and node2vec random walks.
//!
//! This crate covers the first half of the embedding pipeline:
//!
//! - [`Graph`] - weighted adjacency built once from an edge stream
//! - [`formats::EdgeList`] - comma-separated edge-list reader
//! - [`algo::alias::AliasTable`] - O(1) discrete sampling
//! - [`algo::transition::TransitionSampler`] - biased second-order transitions
//! - [`algo::random_walk`] - walk corpus generation
//!
//! # Why Second-Order Walks
//!
//! A first-order walk (DeepWalk) only looks at where it is. node2vec also
//! looks at where it came from, which lets two knobs trade off between
//! two notions of similarity:
//!
//! | Setting | Walk shape | Captures |
//! |---------|------------|----------|
//! | low p | stays near the start | local neighborhoods |
//! | high q | BFS-like | structural equivalence |
//! | low q | DFS-like | homophily, communities |
//! | p = q = 1 | degree-weighted | DeepWalk baseline |
//!
//! # Example
//!
//! ```rust
//! use nodevec_core::algo::random_walk::{generate_walks, RandomWalkConfig};
//! use nodevec_core::formats::EdgeList;
//!
//! let graph = EdgeList::read("1,2\n2,3\n3,4\n".as_bytes(), false).unwrap();
//! let walks = generate_walks(
//!     &graph,
//!     RandomWalkConfig {
//!         walk_length: 5,
//!         num_walks: 2,
//!         p: 0.3,
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//!
//! assert_eq!(walks.len(), 4 * 2);
//! assert!(walks.iter().all(|w| w.len() == 5));
//! ```

pub mod algo;
mod error;
pub mod formats;
mod graph;
mod node;

pub use algo::alias::AliasTable;
pub use algo::random_walk::{generate_walks, RandomWalkConfig, Walk, WalkStats};
pub use algo::transition::TransitionSampler;
pub use error::{Error, Result};
pub use graph::{EdgeRecord, Graph, GraphBuilder, GraphStats};
pub use node::NodeId;

// Re-export petgraph for advanced graph operations
pub use petgraph;
