//! Alias-method sampling for fixed discrete distributions.
//!
//! Vose's construction: `O(n)` preprocessing into two parallel arrays
//! (acceptance probability and alias index), then `O(1)` per draw: one
//! uniform bucket pick and one biased coin.
//!
//! ```text
//! weights  [1, 3]        scaled by n / total = [0.5, 1.5]
//! bucket 0 keeps 0.5, tops up from 1   → prob [0.5, 1.0], alias [1, 1]
//! P(0) = 1/2 · 0.5 = 0.25    P(1) = 1/2 · (1.0 + 0.5) = 0.75
//! ```

use rand::Rng;

/// A sampling structure for a fixed discrete distribution.
#[derive(Debug, Clone)]
pub struct AliasTable {
    prob: Vec<f32>,
    alias: Vec<u32>,
}

impl AliasTable {
    /// Build a table from non-negative weights.
    ///
    /// Returns `None` when there is nothing to sample: no weights, a zero or
    /// non-finite total, or any negative or non-finite weight.
    pub fn new(weights: &[f64]) -> Option<Self> {
        let n = weights.len();
        if n == 0 || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let mut scaled: Vec<f64> = weights.iter().map(|w| w * n as f64 / total).collect();
        let mut prob = vec![1.0f32; n];
        let mut alias: Vec<u32> = (0..n as u32).collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for (i, &s) in scaled.iter().enumerate() {
            if s < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            prob[s] = scaled[s] as f32;
            alias[s] = l as u32;
            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                large.pop();
                small.push(l);
            }
        }
        // Leftovers are 1.0 up to rounding error.
        for i in large.into_iter().chain(small) {
            prob[i] = 1.0;
        }

        Some(Self { prob, alias })
    }

    /// Draw an index in `O(1)`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let i = rng.random_range(0..self.prob.len());
        if rng.random::<f32>() < self.prob[i] {
            i
        } else {
            self.alias[i] as usize
        }
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.prob.len()
    }

    /// Always false: empty distributions are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// The probability this table assigns to outcome `i`.
    ///
    /// Reconstructed from the two arrays, so it reflects what `sample`
    /// actually draws (including `f32` rounding).
    pub fn probability(&self, i: usize) -> f64 {
        let n = self.prob.len() as f64;
        let mut p = f64::from(self.prob[i]);
        for (j, &a) in self.alias.iter().enumerate() {
            if a as usize == i && j != i {
                p += 1.0 - f64::from(self.prob[j]);
            }
        }
        p / n
    }
}
