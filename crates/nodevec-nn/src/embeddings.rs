//! Trained node vectors and similarity lookup.

use crate::{Error, Result};
use nodevec_core::NodeId;
use std::collections::HashMap;

/// A frozen table of node embeddings, one row per vocabulary node.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, u32>,
    dim: usize,
    vectors: Vec<f32>,
}

impl Embeddings {
    /// Wrap a row-major `nodes.len() × dim` table.
    ///
    /// Row `i` belongs to `nodes[i]`. Node ids must be unique.
    pub fn new(nodes: Vec<NodeId>, dim: usize, vectors: Vec<f32>) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter("embedding dimension must be positive".into()));
        }
        if vectors.len() != nodes.len() * dim {
            return Err(Error::InvalidParameter(format!(
                "{} values cannot hold {} rows of dimension {dim}",
                vectors.len(),
                nodes.len()
            )));
        }
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, id) in nodes.iter().enumerate() {
            if index.insert(id.clone(), i as u32).is_some() {
                return Err(Error::InvalidParameter(format!("duplicate node {id}")));
            }
        }
        Ok(Self {
            nodes,
            index,
            dim,
            vectors,
        })
    }

    /// The vector for `node`.
    pub fn get<Q: AsRef<str> + ?Sized>(&self, node: &Q) -> Result<&[f32]> {
        let row = self.row_of(node.as_ref())?;
        Ok(self.row(row))
    }

    /// Whether `node` has a vector.
    pub fn contains<Q: AsRef<str> + ?Sized>(&self, node: &Q) -> bool {
        self.index.contains_key(node.as_ref())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Vector width.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Nodes in row order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// `(node, vector)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &[f32])> + '_ {
        self.nodes.iter().zip(self.vectors.chunks_exact(self.dim))
    }

    /// Cosine similarity between two nodes' vectors.
    ///
    /// A zero vector has similarity 0 with everything.
    pub fn cosine_similarity<A, B>(&self, a: &A, b: &B) -> Result<f32>
    where
        A: AsRef<str> + ?Sized,
        B: AsRef<str> + ?Sized,
    {
        Ok(cosine(self.get(a)?, self.get(b)?))
    }

    /// The `k` nodes most similar to `node` by cosine, best first.
    ///
    /// `node` itself is excluded. Ties are ordered by row.
    pub fn most_similar<Q: AsRef<str> + ?Sized>(
        &self,
        node: &Q,
        k: usize,
    ) -> Result<Vec<(NodeId, f32)>> {
        let row = self.row_of(node.as_ref())?;
        let query = self.row(row);

        let mut scored: Vec<(usize, f32)> = (0..self.nodes.len())
            .filter(|&i| i != row)
            .map(|i| (i, cosine(query, self.row(i))))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| (self.nodes[i].clone(), score))
            .collect())
    }

    fn row_of(&self, node: &str) -> Result<usize> {
        self.index
            .get(node)
            .map(|&i| i as usize)
            .ok_or_else(|| Error::UnknownNode(node.to_string()))
    }

    fn row(&self, row: usize) -> &[f32] {
        &self.vectors[row * self.dim..(row + 1) * self.dim]
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Embeddings {
        let nodes = ["x", "y", "z", "w"].map(NodeId::from).to_vec();
        #[rustfmt::skip]
        let vectors = vec![
            1.0, 0.0,
            0.9, 0.1,
            0.0, 1.0,
            0.0, 0.0,
        ];
        Embeddings::new(nodes, 2, vectors).unwrap()
    }

    #[test]
    fn test_lookup() {
        let e = sample();
        assert_eq!(e.len(), 4);
        assert_eq!(e.dim(), 2);
        assert_eq!(e.get("z").unwrap(), &[0.0, 1.0]);
        assert_eq!(e.get(&NodeId::from("x")).unwrap(), &[1.0, 0.0]);
        assert!(e.contains("y"));
        assert!(!e.contains("q"));
    }

    #[test]
    fn test_unknown_node() {
        let e = sample();
        match e.get("missing") {
            Err(Error::UnknownNode(id)) => assert_eq!(id, "missing"),
            other => panic!("expected UnknownNode, got {other:?}"),
        }
        assert!(e.most_similar("missing", 2).is_err());
    }

    #[test]
    fn test_shape_checked() {
        let nodes = vec![NodeId::from("a")];
        assert!(Embeddings::new(nodes.clone(), 3, vec![0.0; 2]).is_err());
        assert!(Embeddings::new(nodes, 0, vec![]).is_err());

        let dup = vec![NodeId::from("a"), NodeId::from("a")];
        assert!(Embeddings::new(dup, 1, vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn test_cosine_similarity() {
        let e = sample();
        assert_abs_diff_eq!(e.cosine_similarity("x", "x").unwrap(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(e.cosine_similarity("x", "z").unwrap(), 0.0, epsilon = 1e-6);
        // zero vector
        assert_eq!(e.cosine_similarity("x", "w").unwrap(), 0.0);
    }

    #[test]
    fn test_most_similar_excludes_self() {
        let e = sample();
        let top = e.most_similar("x", 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.as_str(), "y");
        assert!(top.iter().all(|(id, _)| id.as_str() != "x"));

        let all = e.most_similar("x", 10).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_iter_in_row_order() {
        let e = sample();
        let ids: Vec<&str> = e.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z", "w"]);
        assert!(e.iter().all(|(_, v)| v.len() == 2));
    }
}
