//! Pipeline configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "dimension": 64, "p": 1.0, "q": 0.5 }
//! ```

use crate::{Error, Result};
use nodevec_core::RandomWalkConfig;
use nodevec_nn::SkipGramConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one embedding run, from edge list to vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node2VecConfig {
    /// Embedding width.
    pub dimension: usize,
    /// Walks started from each node.
    pub num_walks: usize,
    /// Maximum nodes per walk.
    pub walk_length: usize,
    /// Return parameter; lower means more backtracking.
    pub p: f32,
    /// In-out parameter; lower means more outward exploration.
    pub q: f32,
    /// Skip-gram context radius.
    pub window: usize,
    /// Negative samples per positive pair.
    pub negative_samples: usize,
    /// Training passes over the walk corpus.
    pub epochs: usize,
    /// Learning rate at the start of training.
    pub initial_learning_rate: f32,
    /// Learning rate floor reached at the end of training.
    pub min_learning_rate: f32,
    /// Frequency subsampling threshold; 0 disables it.
    pub subsample: f64,
    /// Sample a shrunken window radius per position.
    pub dynamic_window: bool,
    /// Treat the edge list as directed.
    pub directed: bool,
    /// Base seed for walks, initialisation and training.
    pub seed: u64,
    /// Worker threads; 0 uses rayon's default.
    pub workers: usize,
}

impl Default for Node2VecConfig {
    fn default() -> Self {
        Self {
            dimension: 100,
            num_walks: 10,
            walk_length: 80,
            p: 0.3,
            q: 1.0,
            window: 10,
            negative_samples: 5,
            epochs: 1,
            initial_learning_rate: 0.025,
            min_learning_rate: 0.0001,
            subsample: 0.0,
            dynamic_window: false,
            directed: false,
            seed: 42,
            workers: 0,
        }
    }
}

impl Node2VecConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check every value before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.num_walks == 0 {
            return Err(Error::InvalidConfig("num_walks must be positive".into()));
        }
        if self.walk_length < 2 {
            return Err(Error::InvalidConfig(format!(
                "walk_length must be at least 2, got {}",
                self.walk_length
            )));
        }
        for (name, value) in [("p", self.p), ("q", self.q)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        self.skipgram_config()
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// The walk-generation half of the configuration.
    pub fn walk_config(&self) -> RandomWalkConfig {
        RandomWalkConfig {
            walk_length: self.walk_length,
            num_walks: self.num_walks,
            p: self.p,
            q: self.q,
            seed: self.seed,
            workers: self.workers,
        }
    }

    /// The training half of the configuration.
    pub fn skipgram_config(&self) -> SkipGramConfig {
        SkipGramConfig {
            embedding_dim: self.dimension,
            window_size: self.window,
            negative_samples: self.negative_samples,
            epochs: self.epochs,
            learning_rate: self.initial_learning_rate,
            min_learning_rate: self.min_learning_rate,
            subsample: self.subsample,
            dynamic_window: self.dynamic_window,
            seed: self.seed,
            workers: self.workers,
        }
    }
}
