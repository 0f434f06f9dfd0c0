//! Skip-gram training for node embeddings (Node2Vec).
//!
//! # The Core Insight
//!
//! Nodes appearing in similar random walk contexts should have similar embeddings.
//! This is Word2Vec applied to graphs: walks are "sentences," nodes are "words."
//!
//! # Mathematical Foundation
//!
//! Skip-gram with negative sampling (SGNS) maximises, per positive pair:
//!
//! ```text
//! L = log σ(u_c · v_t) + Σᵢ log σ(-u_nᵢ · v_t)
//! ```
//!
//! where `v` rows are target vectors (the output embeddings) and `u` rows
//! are context vectors (discarded after training). One SGD step on L:
//!
//! ```text
//! g      = (label - σ(u_x · v_t)) · lr      for x in {c, n₁..n_k}
//! u_x   += g · v_t
//! v_t   += Σ_x g · u_x                     (applied once, after all x)
//! ```
//!
//! **Key theoretical result** (Levy & Goldberg 2014): SGNS implicitly factorizes
//! a shifted PMI matrix, `v_w · u_c ≈ PMI(w, c) - log k`.
//!
//! # Numerics
//!
//! Scores are clamped to `±MAX_EXP` before the sigmoid. A step whose
//! gradient is not finite is skipped and counted in
//! [`TrainReport::anomalies`]; training carries on.
//!
//! # Parallelism
//!
//! Walks are split into chunks and trained Hogwild-style on a
//! [`SharedMatrix`]. Each chunk draws from its own seed-derived RNG, and the
//! learning-rate progress counter is shared. With `workers = 1` a run is
//! fully deterministic.
//!
//! # References
//!
//! - Grover & Leskovec (2016). "node2vec: Scalable Feature Learning for Networks."
//! - Mikolov et al. (2013). "Distributed Representations of Words and Phrases."
//! - Levy & Goldberg (2014). "Neural Word Embedding as Implicit Matrix Factorization."

use crate::matrix::SharedMatrix;
use crate::{Embeddings, Error, Result, Vocabulary};
use nodevec_core::algo::random_walk::derive_seed;
use nodevec_core::AliasTable;
use rand::prelude::*;
use rand_distr::{Distribution, Uniform};
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Scores are clamped to `[-MAX_EXP, MAX_EXP]` before the sigmoid.
pub const MAX_EXP: f32 = 6.0;

/// Walks per parallel work unit.
const CHUNK_WALKS: usize = 256;

/// Anomalies beyond this many are counted but not logged individually.
const MAX_LOGGED_ANOMALIES: u64 = 8;

/// Mixed into the base seed so training streams differ from walk streams.
const TRAIN_SALT: u64 = 0x5EED_7A1D_C0FF_EE00;

/// Skip-gram model configuration.
#[derive(Debug, Clone)]
pub struct SkipGramConfig {
    /// Embedding dimension.
    pub embedding_dim: usize,
    /// Context window size (each side).
    pub window_size: usize,
    /// Number of negative samples per positive.
    pub negative_samples: usize,
    /// Passes over the corpus.
    pub epochs: usize,
    /// Initial learning rate.
    pub learning_rate: f32,
    /// Minimum learning rate (for decay).
    pub min_learning_rate: f32,
    /// Frequency subsampling threshold; 0 disables it.
    pub subsample: f64,
    /// Draw the window radius uniformly from `1..=window_size` per position.
    pub dynamic_window: bool,
    /// Random seed.
    pub seed: u64,
    /// Worker threads; 0 uses rayon's default.
    pub workers: usize,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 100,
            window_size: 10,
            negative_samples: 5,
            epochs: 1,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            subsample: 0.0,
            dynamic_window: false,
            seed: 42,
            workers: 0,
        }
    }
}

impl SkipGramConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidParameter(msg));
        if self.embedding_dim == 0 {
            return invalid("embedding_dim must be positive".into());
        }
        if self.window_size == 0 {
            return invalid("window_size must be positive".into());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return invalid(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }
        if !self.min_learning_rate.is_finite()
            || self.min_learning_rate < 0.0
            || self.min_learning_rate > self.learning_rate
        {
            return invalid(format!(
                "min_learning_rate must be in [0, learning_rate], got {}",
                self.min_learning_rate
            ));
        }
        if !self.subsample.is_finite() || self.subsample < 0.0 {
            return invalid(format!("subsample must be non-negative, got {}", self.subsample));
        }
        Ok(())
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    /// Epochs completed.
    pub epochs: usize,
    /// Positive (target, context) pairs trained.
    pub pairs: u64,
    /// Negative pairs trained.
    pub negatives: u64,
    /// Skipped updates with non-finite gradients.
    pub anomalies: u64,
    /// Mean loss per positive pair, per epoch.
    pub epoch_losses: Vec<f64>,
    /// Learning rate at the end of training.
    pub final_learning_rate: f32,
}

/// Per-chunk accumulators.
#[derive(Debug, Clone, Copy, Default)]
struct ChunkTotals {
    pairs: u64,
    negatives: u64,
    loss: f64,
}

impl ChunkTotals {
    fn merge(self, other: Self) -> Self {
        Self {
            pairs: self.pairs + other.pairs,
            negatives: self.negatives + other.negatives,
            loss: self.loss + other.loss,
        }
    }
}

/// Scratch space owned by one worker while it trains a chunk.
struct Worker<'n> {
    rng: XorShiftRng,
    negatives: &'n AliasTable,
    target_row: Vec<f32>,
    context_row: Vec<f32>,
    grad: Vec<f32>,
    kept: Vec<u32>,
    totals: ChunkTotals,
}

/// Skip-gram model for node embedding training.
///
/// Uses two embedding matrices:
/// - `target`: Target node embeddings (what we output)
/// - `context`: Context embeddings (discarded after training)
pub struct SkipGram {
    /// Target embeddings: (num_nodes, embedding_dim)
    target: SharedMatrix,
    /// Context embeddings: (num_nodes, embedding_dim)
    context: SharedMatrix,
    /// Configuration
    config: SkipGramConfig,
    /// Words processed (for LR decay)
    words_processed: AtomicUsize,
    /// Total words to process
    total_words: usize,
    anomalies: AtomicU64,
}

impl SkipGram {
    /// Create a new Skip-gram model.
    ///
    /// Target vectors start uniform in `[-0.5/dim, 0.5/dim)`; context vectors
    /// start at zero.
    pub fn new(num_nodes: usize, config: SkipGramConfig) -> Result<Self> {
        config.validate()?;
        let dim = config.embedding_dim;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let half = 0.5 / dim as f32;
        let dist = Uniform::new(-half, half)
            .map_err(|e| Error::InvalidParameter(format!("initialisation range: {e}")))?;

        let target: Vec<f32> = (0..num_nodes * dim).map(|_| dist.sample(&mut rng)).collect();

        Ok(Self {
            target: SharedMatrix::from_values(target, dim),
            context: SharedMatrix::filled(num_nodes, dim, 0.0),
            config,
            words_processed: AtomicUsize::new(0),
            total_words: 0,
            anomalies: AtomicU64::new(0),
        })
    }

    /// Train over an encoded corpus (vocabulary indices, see [`Vocabulary::encode`]).
    pub fn train(&mut self, corpus: &[Vec<u32>], vocab: &Vocabulary) -> Result<TrainReport> {
        if vocab.len() != self.num_nodes() {
            return Err(Error::InvalidParameter(format!(
                "model has {} rows but vocabulary has {} nodes",
                self.num_nodes(),
                vocab.len()
            )));
        }
        let tokens: usize = corpus.iter().map(Vec::len).sum();
        if tokens == 0 {
            return Err(Error::EmptyCorpus);
        }
        self.total_words = tokens * self.config.epochs;
        self.words_processed.store(0, Ordering::Relaxed);

        let negatives = vocab.negative_sampler();
        let keep: Option<Vec<f32>> = (self.config.subsample > 0.0).then(|| {
            (0..vocab.len() as u32)
                .map(|i| vocab.keep_probability(i, self.config.subsample) as f32)
                .collect()
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| Error::InvalidParameter(format!("cannot build worker pool: {e}")))?;

        let mut report = TrainReport::default();
        let mut order: Vec<usize> = (0..corpus.len()).collect();
        let this = &*self;
        let train_seed = this.config.seed ^ TRAIN_SALT;

        for epoch in 0..this.config.epochs {
            let shuffle_seed = derive_seed(train_seed, epoch as u64, u64::MAX);
            let mut rng = XorShiftRng::seed_from_u64(shuffle_seed);
            order.shuffle(&mut rng);

            let totals = pool.install(|| {
                order
                    .par_chunks(CHUNK_WALKS)
                    .enumerate()
                    .map(|(chunk_idx, chunk)| {
                        let seed = derive_seed(train_seed, epoch as u64, chunk_idx as u64);
                        let mut worker = this.worker(seed, &negatives);
                        for &w in chunk {
                            this.train_walk(&corpus[w], keep.as_deref(), &mut worker);
                        }
                        worker.totals
                    })
                    .reduce(ChunkTotals::default, ChunkTotals::merge)
            });

            let mean_loss = if totals.pairs > 0 {
                totals.loss / totals.pairs as f64
            } else {
                0.0
            };
            debug!(
                epoch,
                pairs = totals.pairs,
                mean_loss,
                learning_rate = this.current_lr(),
                "finished skip-gram epoch"
            );
            report.pairs += totals.pairs;
            report.negatives += totals.negatives;
            report.epoch_losses.push(mean_loss);
            report.epochs += 1;
        }

        report.anomalies = self.anomalies.load(Ordering::Relaxed);
        report.final_learning_rate = self.current_lr();
        info!(
            epochs = report.epochs,
            pairs = report.pairs,
            anomalies = report.anomalies,
            final_learning_rate = report.final_learning_rate,
            "trained skip-gram model"
        );
        Ok(report)
    }

    fn worker<'n>(&self, seed: u64, negatives: &'n AliasTable) -> Worker<'n> {
        let dim = self.config.embedding_dim;
        Worker {
            rng: XorShiftRng::seed_from_u64(seed),
            negatives,
            target_row: vec![0.0; dim],
            context_row: vec![0.0; dim],
            grad: vec![0.0; dim],
            kept: Vec::new(),
            totals: ChunkTotals::default(),
        }
    }

    /// Train on a single walk.
    ///
    /// For each position, predicts context nodes and updates embeddings.
    fn train_walk(&self, walk: &[u32], keep: Option<&[f32]>, worker: &mut Worker<'_>) {
        let lr = self.current_lr();

        worker.kept.clear();
        match keep {
            Some(keep) => {
                for &node in walk {
                    if worker.rng.random::<f32>() < keep[node as usize] {
                        worker.kept.push(node);
                    }
                }
            }
            None => worker.kept.extend_from_slice(walk),
        }
        let kept = std::mem::take(&mut worker.kept);

        let window = self.config.window_size;
        for (pos, &target) in kept.iter().enumerate() {
            let radius = if self.config.dynamic_window {
                worker.rng.random_range(1..=window)
            } else {
                window
            };

            let start = pos.saturating_sub(radius);
            let end = (pos + radius + 1).min(kept.len());
            for (ctx_pos, &context) in kept.iter().enumerate().take(end).skip(start) {
                if ctx_pos == pos {
                    continue;
                }
                self.train_pair(target, context, lr, worker);
            }
        }

        worker.kept = kept;
        self.words_processed.fetch_add(walk.len(), Ordering::Relaxed);
    }

    /// One SGD step for a positive `(target, context)` pair and its negatives.
    fn train_pair(&self, target: u32, context: u32, lr: f32, worker: &mut Worker<'_>) {
        let (t, c) = (target as usize, context as usize);
        self.target.read_row(t, &mut worker.target_row);
        if !worker.target_row.iter().all(|v| v.is_finite()) {
            self.record_anomaly(target, context);
            return;
        }
        worker.grad.iter_mut().for_each(|g| *g = 0.0);

        worker.totals.pairs += 1;
        for k in 0..=self.config.negative_samples {
            let (x, label) = if k == 0 {
                (c, 1.0f32)
            } else {
                let n = worker.negatives.sample(&mut worker.rng);
                if n == c {
                    continue;
                }
                worker.totals.negatives += 1;
                (n, 0.0)
            };

            let score = self
                .context
                .dot(x, &worker.target_row)
                .clamp(-MAX_EXP, MAX_EXP);
            let sigma = sigmoid(score);
            let g = (label - sigma) * lr;
            self.context.read_row(x, &mut worker.context_row);
            if !g.is_finite() || !worker.context_row.iter().all(|v| v.is_finite()) {
                self.record_anomaly(target, x as u32);
                continue;
            }

            let p_label = if label > 0.0 { sigma } else { 1.0 - sigma };
            worker.totals.loss -= f64::from(p_label.ln());
            for (acc, u) in worker.grad.iter_mut().zip(&worker.context_row) {
                *acc += g * u;
            }
            self.context.add_scaled(x, g, &worker.target_row);
        }

        if worker.grad.iter().all(|g| g.is_finite()) {
            self.target.add(t, &worker.grad);
        } else {
            self.record_anomaly(target, context);
        }
    }

    fn record_anomaly(&self, target: u32, other: u32) {
        let seen = self.anomalies.fetch_add(1, Ordering::Relaxed);
        if seen < MAX_LOGGED_ANOMALIES {
            warn!(target, other, "skipped non-finite gradient step");
        }
    }

    /// Learning rate for the current progress, decaying linearly.
    fn current_lr(&self) -> f32 {
        let lr0 = self.config.learning_rate;
        let min = self.config.min_learning_rate;
        if self.total_words == 0 {
            return lr0;
        }
        let processed = self.words_processed.load(Ordering::Relaxed);
        let progress = processed as f32 / self.total_words as f32;
        (lr0 - (lr0 - min) * progress).max(min)
    }

    /// Number of rows (vocabulary size).
    pub fn num_nodes(&self) -> usize {
        self.target.rows()
    }

    /// Embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Anomalies seen so far.
    pub fn anomalies(&self) -> u64 {
        self.anomalies.load(Ordering::Relaxed)
    }

    /// Freeze the target table into an embedding store.
    pub fn into_embeddings(self, vocab: Vocabulary) -> Result<Embeddings> {
        let (nodes, _) = vocab.into_parts();
        Embeddings::new(nodes, self.config.embedding_dim, self.target.into_values())
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
