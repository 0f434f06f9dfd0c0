//! Walk-corpus vocabulary and the negative-sampling distribution.
//!
//! The vocabulary is ranked by frequency (most frequent node gets index 0),
//! ties broken by node identifier so the ranking is deterministic.
//!
//! Negative samples are drawn from counts raised to 3/4, which sits between
//! two bad extremes:
//!
//! ```text
//! count^1    (unigram)  → hubs crowd out everything else
//! count^0    (uniform)  → rare nodes are over-sampled
//! count^0.75            → hubs still favoured, but less
//! ```

use crate::{Error, Result};
use nodevec_core::{AliasTable, Graph, NodeId, Walk};
use std::collections::HashMap;

/// Exponent applied to counts for the negative-sampling distribution.
pub const NEGATIVE_POWER: f64 = 0.75;

/// Bijection between nodes seen in the walks and dense indices, with counts.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    nodes: Vec<NodeId>,
    counts: Vec<u64>,
    index: HashMap<NodeId, u32>,
    /// Graph node index -> vocabulary index.
    graph_to_vocab: Vec<Option<u32>>,
    total: u64,
}

impl Vocabulary {
    /// Build the vocabulary from a walk corpus over `graph`.
    ///
    /// Fails with [`Error::EmptyCorpus`] if the walks contain no tokens.
    pub fn build(graph: &Graph, walks: &[Walk]) -> Result<Self> {
        let mut counts = vec![0u64; graph.node_count()];
        for &v in walks.iter().flatten() {
            if let Some(c) = counts.get_mut(v as usize) {
                *c += 1;
            }
        }

        let mut seen: Vec<(u32, u64)> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(v, &c)| (v as u32, c))
            .collect();
        if seen.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        seen.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| graph.node_id(a.0).cmp(&graph.node_id(b.0)))
        });

        let mut vocab = Self {
            nodes: Vec::with_capacity(seen.len()),
            counts: Vec::with_capacity(seen.len()),
            index: HashMap::with_capacity(seen.len()),
            graph_to_vocab: vec![None; graph.node_count()],
            total: 0,
        };
        for (v, c) in seen {
            let Some(id) = graph.node_id(v) else { continue };
            let i = vocab.nodes.len() as u32;
            vocab.nodes.push(id.clone());
            vocab.counts.push(c);
            vocab.index.insert(id.clone(), i);
            vocab.graph_to_vocab[v as usize] = Some(i);
            vocab.total += c;
        }
        Ok(vocab)
    }

    /// Translate walks from graph indices to vocabulary indices.
    pub fn encode(&self, walks: &[Walk]) -> Vec<Vec<u32>> {
        walks
            .iter()
            .map(|walk| {
                walk.iter()
                    .filter_map(|&v| self.graph_to_vocab.get(v as usize).copied().flatten())
                    .collect()
            })
            .collect()
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the vocabulary is empty (never true for a built vocabulary).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Occurrences of the node at `index` across the corpus.
    pub fn count(&self, index: u32) -> u64 {
        self.counts[index as usize]
    }

    /// Total tokens in the corpus.
    pub fn total_tokens(&self) -> u64 {
        self.total
    }

    /// Vocabulary index of a node.
    pub fn index_of(&self, id: &NodeId) -> Option<u32> {
        self.index.get(id).copied()
    }

    /// Node at a vocabulary index.
    pub fn node(&self, index: u32) -> &NodeId {
        &self.nodes[index as usize]
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Split into the node list and its reverse index.
    pub fn into_parts(self) -> (Vec<NodeId>, HashMap<NodeId, u32>) {
        (self.nodes, self.index)
    }

    /// The smoothed negative-sampling distribution, `count^0.75` renormalised.
    pub fn negative_distribution(&self) -> Vec<f64> {
        let smoothed: Vec<f64> = self
            .counts
            .iter()
            .map(|&c| (c as f64).powf(NEGATIVE_POWER))
            .collect();
        let total: f64 = smoothed.iter().sum();
        smoothed.into_iter().map(|w| w / total).collect()
    }

    /// An alias table over [`Self::negative_distribution`].
    pub fn negative_sampler(&self) -> AliasTable {
        AliasTable::new(&self.negative_distribution())
            .unwrap_or_else(|| unreachable!("built vocabularies have positive counts"))
    }

    /// Probability of keeping one occurrence of `index` under frequency
    /// subsampling with threshold `sample` (word2vec rule), capped at 1.
    ///
    /// A threshold of 0 disables subsampling.
    pub fn keep_probability(&self, index: u32, sample: f64) -> f64 {
        if sample <= 0.0 {
            return 1.0;
        }
        let freq = self.count(index) as f64 / self.total as f64;
        (((freq / sample).sqrt() + 1.0) * sample / freq).min(1.0)
    }
}
