//! Second-order transition distributions for node2vec walks.
//!
//! A walk at `v` that arrived from `t` moves to neighbor `x` with
//! unnormalised weight `w(v, x) · α(t, x)`:
//!
//! ```text
//! α(t, x) = 1/p   if x == t            (return)
//!         = 1     if x is adjacent to t (stay local)
//!         = 1/q   otherwise            (move outward)
//! ```
//!
//! Each distinct `(t, v)` pair gets an alias table the first time a walk
//! needs it. Tables are shared across threads; construction of a given key
//! happens once, under the cache shard's entry lock.

use super::alias::AliasTable;
use crate::{Error, Graph, Result};
use dashmap::DashMap;
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;

/// Samples the next node of a walk.
pub struct TransitionSampler<'a> {
    graph: &'a Graph,
    p: f64,
    q: f64,
    /// Weight-proportional tables, one per node (`None` for dead ends).
    first_order: Vec<Option<AliasTable>>,
    /// Lazily built `(prev, cur)` tables.
    second_order: DashMap<(u32, u32), Arc<AliasTable>>,
    unbiased: bool,
}

impl<'a> TransitionSampler<'a> {
    /// Create a sampler for `graph` with return parameter `p` and in-out
    /// parameter `q`.
    pub fn new(graph: &'a Graph, p: f32, q: f32) -> Result<Self> {
        for (name, value) in [("p", p), ("q", q)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let first_order = graph
            .node_indices()
            .map(|v| {
                let weights: Vec<f64> = graph
                    .neighbors(v)
                    .iter()
                    .map(|&(_, w)| f64::from(w))
                    .collect();
                AliasTable::new(&weights)
            })
            .collect();

        let unbiased = (p - 1.0).abs() < f32::EPSILON && (q - 1.0).abs() < f32::EPSILON;

        Ok(Self {
            graph,
            p: f64::from(p),
            q: f64::from(q),
            first_order,
            second_order: DashMap::new(),
            unbiased,
        })
    }

    /// Sample the node after `cur`, given the node visited before it.
    ///
    /// Returns `None` when `cur` has no neighbors.
    pub fn sample<R: Rng + ?Sized>(&self, prev: Option<u32>, cur: u32, rng: &mut R) -> Option<u32> {
        let neighbors = self.graph.neighbors(cur);
        let slot = match prev {
            Some(prev) if !self.unbiased => {
                let table = self.table_for(prev, cur)?;
                table.sample(rng)
            }
            _ => self.first_order.get(cur as usize)?.as_ref()?.sample(rng),
        };
        neighbors.get(slot).map(|&(n, _)| n)
    }

    /// The unnormalised second-order weights over `cur`'s neighbors.
    ///
    /// Order matches [`Graph::neighbors`].
    pub fn biased_weights(&self, prev: u32, cur: u32) -> Vec<f64> {
        let inv_p = 1.0 / self.p;
        let inv_q = 1.0 / self.q;
        self.graph
            .neighbors(cur)
            .iter()
            .map(|&(x, w)| {
                let alpha = if x == prev {
                    inv_p
                } else if self.graph.has_edge(prev, x) {
                    1.0
                } else {
                    inv_q
                };
                f64::from(w) * alpha
            })
            .collect()
    }

    /// The alias table for `(prev, cur)`, building and caching it on first use.
    pub fn table_for(&self, prev: u32, cur: u32) -> Option<Arc<AliasTable>> {
        if let Some(table) = self.second_order.get(&(prev, cur)) {
            return Some(Arc::clone(table.value()));
        }
        let entry = self
            .second_order
            .entry((prev, cur))
            .or_try_insert_with(|| {
                AliasTable::new(&self.biased_weights(prev, cur))
                    .map(Arc::new)
                    .ok_or(())
            })
            .ok()?;
        Some(Arc::clone(entry.value()))
    }

    /// Eagerly build tables for every edge `(t, v)` of the graph.
    pub fn precompute_all(&self) {
        if self.unbiased {
            return;
        }
        self.graph.node_indices().into_par_iter().for_each(|t| {
            for &(v, _) in self.graph.neighbors(t) {
                let _ = self.table_for(t, v);
            }
        });
    }

    /// Number of cached second-order tables.
    pub fn cached_pairs(&self) -> usize {
        self.second_order.len()
    }

    /// Whether the sampler degenerates to a first-order walk (p = q = 1).
    pub fn is_unbiased(&self) -> bool {
        self.unbiased
    }

    /// The graph being walked.
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }
}
