//! `Node2Vec`-style random walk generation.
//!
//! Implements biased 2nd-order random walks as described in:
//! Grover & Leskovec, "node2vec: Scalable Feature Learning for Networks" (KDD 2016)
//!
//! ## Performance Notes
//!
//! - Alias tables give O(1) per step after O(d) setup per visited `(prev, cur)` pair
//! - p = q = 1 reuses the first-order tables (DeepWalk) and caches nothing
//! - Parallelized across (round, root) units via rayon
//!
//! ## Reproducibility
//!
//! Every walk draws from its own `XorShiftRng`, seeded from
//! `(seed, round, root)`. A walk therefore does not depend on which thread
//! ran it or what ran before it, and the corpus order is fixed by the
//! per-round shuffle. Callers should still treat equality across different
//! `workers` settings as best-effort.

use super::transition::TransitionSampler;
use crate::{Error, Graph, Result};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use tracing::info;

/// A walk: graph node indices in visiting order.
pub type Walk = Vec<u32>;

/// Configuration for random walks.
#[derive(Debug, Clone, Copy)]
pub struct RandomWalkConfig {
    /// Maximum length of each random walk (number of nodes, root included).
    pub walk_length: usize,
    /// Number of walks to start from each node.
    pub num_walks: usize,
    /// Return parameter (p) - likelihood of returning to previous node.
    /// - p > 1: less likely to backtrack
    /// - p < 1: more likely to backtrack
    pub p: f32,
    /// In-out parameter (q) - controls BFS vs DFS behavior.
    /// - q > 1: BFS-like (local exploration)
    /// - q < 1: DFS-like (outward exploration)
    pub q: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Worker threads; 0 uses rayon's default.
    pub workers: usize,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            walk_length: 80,
            num_walks: 10,
            p: 1.0,
            q: 1.0,
            seed: 42,
            workers: 0,
        }
    }
}

/// Counts describing a generated corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Number of walks.
    pub walks: usize,
    /// Total nodes across all walks.
    pub tokens: usize,
    /// Walks that hit a dead end before `walk_length`.
    pub truncated: usize,
}

impl WalkStats {
    /// Compute stats for a corpus.
    pub fn of(walks: &[Walk], walk_length: usize) -> Self {
        Self {
            walks: walks.len(),
            tokens: walks.iter().map(Vec::len).sum(),
            truncated: walks.iter().filter(|w| w.len() < walk_length).count(),
        }
    }
}

/// Generate random walks for all nodes in the graph.
///
/// # Arguments
/// * `graph` - The graph to walk
/// * `config` - Walk configuration
///
/// # Returns
/// `num_walks` rounds of one walk per node with at least one neighbor,
/// concatenated.
///
/// A node with no out-neighbors roots nothing, including a sink of a
/// directed graph that other walks do reach. Such a node therefore appears
/// only where walks end at it, never as a length-1 walk of its own, and its
/// corpus count (and so its negative-sampling weight) reflects that.
pub fn generate_walks(graph: &Graph, config: RandomWalkConfig) -> Result<Vec<Walk>> {
    let sampler = TransitionSampler::new(graph, config.p, config.q)?;
    Node2VecWalker::new(&sampler, config).walk()
}

/// Derive an independent stream seed for a unit of work.
pub fn derive_seed(seed: u64, a: u64, b: u64) -> u64 {
    const K1: u64 = 0x9E37_79B9_7F4A_7C15;
    const K2: u64 = 0xC2B2_AE3D_27D4_EB4F;
    seed ^ a.wrapping_add(1).wrapping_mul(K1) ^ b.wrapping_add(1).wrapping_mul(K2)
}

/// `Node2Vec` random walker.
pub struct Node2VecWalker<'s, 'g> {
    sampler: &'s TransitionSampler<'g>,
    config: RandomWalkConfig,
}

impl<'s, 'g> Node2VecWalker<'s, 'g> {
    /// Create a walker over a sampler.
    #[must_use]
    pub const fn new(sampler: &'s TransitionSampler<'g>, config: RandomWalkConfig) -> Self {
        Self { sampler, config }
    }

    /// Generate all random walks using parallel processing.
    pub fn walk(&self) -> Result<Vec<Walk>> {
        let graph = self.sampler.graph();
        if self.config.walk_length == 0 || self.config.num_walks == 0 {
            return Ok(Vec::new());
        }

        // Nodes without neighbors root no walk: a lone token has no context.
        let roots: Vec<u32> = graph.node_indices().filter(|&v| graph.degree(v) > 0).collect();

        // Fixed per-round root order, then one task per (round, root).
        let mut units = Vec::with_capacity(self.config.num_walks * roots.len());
        for round in 0..self.config.num_walks {
            let mut roots = roots.clone();
            let seed = derive_seed(self.config.seed, round as u64, u64::MAX);
            let mut rng = XorShiftRng::seed_from_u64(seed);
            roots.shuffle(&mut rng);
            units.extend(roots.into_iter().map(|root| (round, root)));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| Error::InvalidParameter(format!("cannot build worker pool: {e}")))?;

        let walks: Vec<Walk> = pool.install(|| {
            units
                .par_iter()
                .map(|&(round, root)| self.walk_from(root, round))
                .collect()
        });

        let stats = WalkStats::of(&walks, self.config.walk_length);
        info!(
            walks = stats.walks,
            tokens = stats.tokens,
            truncated = stats.truncated,
            cached_pairs = self.sampler.cached_pairs(),
            "generated random walks"
        );
        Ok(walks)
    }

    /// Generate the walk rooted at `root` for round `round`.
    ///
    /// Deterministic for a given config seed.
    pub fn walk_from(&self, root: u32, round: usize) -> Walk {
        let seed = derive_seed(self.config.seed, round as u64, u64::from(root));
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let mut walk = Vec::with_capacity(self.config.walk_length);
        if self.config.walk_length == 0 {
            return walk;
        }
        walk.push(root);

        let mut prev = None;
        let mut cur = root;
        while walk.len() < self.config.walk_length {
            let Some(next) = self.sampler.sample(prev, cur, &mut rng) else {
                break;
            };
            walk.push(next);
            prev = Some(cur);
            cur = next;
        }
        walk
    }
}
