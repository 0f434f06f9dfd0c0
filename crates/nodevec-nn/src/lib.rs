#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

//! Skip-gram training that turns walk corpora into node embeddings.
//!
//! - [`Vocabulary`] - frequency-ranked node index and negative-sampling weights
//! - [`SkipGram`] - SGNS trainer over a shared Hogwild matrix
//! - [`Embeddings`] - the trained vectors, with word2vec text I/O
//!
//! ```text
//! walks ──► Vocabulary ──encode──► SkipGram::train ──► Embeddings ──► .emb
//! ```
//!
//! # Example
//!
//! ```rust
//! use nodevec_core::{generate_walks, Graph, RandomWalkConfig};
//! use nodevec_nn::{SkipGram, SkipGramConfig, Vocabulary};
//!
//! let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("c", "a")], false).unwrap();
//! let walk_config = RandomWalkConfig {
//!     walk_length: 8,
//!     ..Default::default()
//! };
//! let walks = generate_walks(&graph, walk_config).unwrap();
//!
//! let vocab = Vocabulary::build(&graph, &walks).unwrap();
//! let corpus = vocab.encode(&walks);
//! let config = SkipGramConfig {
//!     embedding_dim: 8,
//!     window_size: 2,
//!     ..Default::default()
//! };
//! let mut model = SkipGram::new(vocab.len(), config).unwrap();
//! model.train(&corpus, &vocab).unwrap();
//!
//! let embeddings = model.into_embeddings(vocab).unwrap();
//! assert_eq!(embeddings.get("a").unwrap().len(), 8);
//! ```

mod embeddings;
mod error;
pub mod matrix;
pub mod skipgram;
pub mod vocab;
mod word2vec;

pub use embeddings::Embeddings;
pub use error::{Error, Result};
pub use matrix::SharedMatrix;
pub use skipgram::{SkipGram, SkipGramConfig, TrainReport};
pub use vocab::Vocabulary;
