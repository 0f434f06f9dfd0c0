#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! node2vec node embeddings.
//!
//! Biased second-order random walks over a graph, then skip-gram with
//! negative sampling over the walk corpus:
//!
//! ```text
//! edge list ─► Graph ─► walks ─► Vocabulary ─► SkipGram ─► Embeddings
//!             (core)   (core)      (nn)          (nn)        (nn)
//! ```
//!
//! | Crate | Provides |
//! |-------|----------|
//! | [`nodevec_core`] | graph storage, alias tables, walk generation |
//! | [`nodevec_nn`] | vocabulary, SGNS training, word2vec text I/O |
//!
//! # Example
//!
//! ```rust
//! use nodevec::{fit, Graph, Node2VecConfig};
//!
//! let graph = Graph::from_edges([("1", "2"), ("2", "3"), ("3", "1")], false).unwrap();
//! let config = Node2VecConfig {
//!     dimension: 8,
//!     walk_length: 10,
//!     ..Default::default()
//! };
//! let (embeddings, report) = fit(&graph, &config).unwrap();
//!
//! assert_eq!(embeddings.len(), 3);
//! assert_eq!(embeddings.get("2").unwrap().len(), 8);
//! assert_eq!(report.epochs, 1);
//! ```

mod config;
mod error;
mod pipeline;

pub use config::Node2VecConfig;
pub use error::{Error, Result};
pub use pipeline::{embed_edge_file, fit};

pub use nodevec_core::formats::EdgeList;
pub use nodevec_core::{EdgeRecord, Graph, GraphBuilder, NodeId, RandomWalkConfig};
pub use nodevec_nn::{Embeddings, SkipGramConfig, TrainReport};
