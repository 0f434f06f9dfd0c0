use crate::{Error, NodeId, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// One parsed record of an edge stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// 1-based position of the record in its source (for error messages).
    pub line: usize,
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Edge weight; `None` means unweighted (1.0).
    pub weight: Option<f32>,
}

impl EdgeRecord {
    /// Unweighted record.
    pub fn new(line: usize, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            line,
            source: source.into(),
            target: target.into(),
            weight: None,
        }
    }

    /// Attach a weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Summary counts for a loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of distinct edges (an undirected edge counts once).
    pub edge_count: usize,
    /// Number of stored adjacency entries (undirected edges count twice).
    pub arc_count: usize,
    /// Whether the graph is directed.
    pub directed: bool,
}

/// In-memory weighted graph built once from an edge stream.
///
/// Uses petgraph's directed graph internally; undirected graphs store both
/// directions of every edge. A compact adjacency list sorted by neighbor
/// index sits next to it so samplers get `O(1)` neighbor slices and
/// `O(log d)` membership tests.
///
/// # Example
///
/// ```rust
/// use nodevec_core::Graph;
///
/// let graph = Graph::from_edges([("1", "2"), ("2", "3")], false).unwrap();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.degree(graph.index_of(&"2".into()).unwrap()), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    /// The underlying directed graph (node weight = id, edge weight = weight).
    graph: DiGraph<NodeId, f32>,

    /// Map from node ID to node index.
    node_index: HashMap<NodeId, NodeIndex>,

    /// Per-node `(neighbor, weight)` pairs, sorted by neighbor index.
    adjacency: Vec<Vec<(u32, f32)>>,

    directed: bool,

    edge_count: usize,
}

/// Incremental construction of a [`Graph`].
///
/// Nodes may be declared without edges; such nodes are isolated and never
/// root a walk.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    directed: bool,
    ids: Vec<NodeId>,
    positions: HashMap<NodeId, u32>,
    edge_order: Vec<(u32, u32)>,
    weights: HashMap<(u32, u32), f32>,
}

impl GraphBuilder {
    /// Start an empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Default::default()
        }
    }

    /// Declare a node, returning its index. Idempotent.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> Result<u32> {
        let id = id.into();
        if !NodeId::is_valid_token(id.as_str()) {
            return Err(Error::InvalidParameter(format!(
                "invalid node identifier {:?}",
                id.as_str()
            )));
        }
        Ok(self.intern(id))
    }

    /// Add one edge record, merging it with any earlier copy.
    pub fn add_edge(&mut self, record: EdgeRecord) -> Result<()> {
        validate_record(&record)?;

        let s = self.intern(record.source);
        let t = self.intern(record.target);
        let key = if self.directed || s <= t { (s, t) } else { (t, s) };
        let w = record.weight.unwrap_or(1.0);

        match self.weights.get_mut(&key) {
            Some(total) => *total += w,
            None => {
                self.weights.insert(key, w);
                self.edge_order.push(key);
            }
        }
        Ok(())
    }

    /// Number of distinct edges added so far.
    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    /// Freeze into a graph. Fails with `EmptyGraph` when no edge was added.
    pub fn build(self) -> Result<Graph> {
        if self.edge_order.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let directed = self.directed;

        let mut graph = DiGraph::with_capacity(self.ids.len(), self.edge_order.len() * 2);
        let mut node_index = HashMap::with_capacity(self.ids.len());
        for id in self.ids {
            let idx = graph.add_node(id.clone());
            node_index.insert(id, idx);
        }

        let mut adjacency: Vec<Vec<(u32, f32)>> = vec![Vec::new(); node_index.len()];
        for &(s, t) in &self.edge_order {
            let w = self.weights[&(s, t)];
            graph.add_edge(NodeIndex::new(s as usize), NodeIndex::new(t as usize), w);
            adjacency[s as usize].push((t, w));
            if !directed && s != t {
                graph.add_edge(NodeIndex::new(t as usize), NodeIndex::new(s as usize), w);
                adjacency[t as usize].push((s, w));
            }
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable_by_key(|&(n, _)| n);
        }

        Ok(Graph {
            graph,
            node_index,
            adjacency,
            directed,
            edge_count: self.edge_order.len(),
        })
    }

    fn intern(&mut self, id: NodeId) -> u32 {
        if let Some(&pos) = self.positions.get(&id) {
            return pos;
        }
        let pos = self.ids.len() as u32;
        self.ids.push(id.clone());
        self.positions.insert(id, pos);
        pos
    }
}

impl Graph {
    /// Build a graph from a stream of edge records.
    ///
    /// Repeated edges are merged by summing their weights (1.0 each when
    /// unweighted). In an undirected graph `a,b` and `b,a` are the same edge.
    /// The first malformed record aborts the load.
    pub fn load<I>(edges: I, directed: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Result<EdgeRecord>>,
    {
        let mut builder = GraphBuilder::new(directed);
        for record in edges {
            builder.add_edge(record?)?;
        }
        builder.build()
    }

    /// Build an unweighted graph from in-memory `(source, target)` pairs.
    pub fn from_edges<I, A, B>(edges: I, directed: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<NodeId>,
        B: Into<NodeId>,
    {
        Self::load(
            edges
                .into_iter()
                .enumerate()
                .map(|(i, (s, t))| Ok(EdgeRecord::new(i + 1, s, t))),
            directed,
        )
    }

    /// Build a weighted graph from in-memory `(source, target, weight)` triples.
    pub fn from_weighted_edges<I, A, B>(edges: I, directed: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B, f32)>,
        A: Into<NodeId>,
        B: Into<NodeId>,
    {
        Self::load(
            edges
                .into_iter()
                .enumerate()
                .map(|(i, (s, t, w))| Ok(EdgeRecord::new(i + 1, s, t).with_weight(w))),
            directed,
        )
    }

    /// Neighbors of a node as `(neighbor, weight)`, sorted by neighbor index.
    pub fn neighbors(&self, node: u32) -> &[(u32, f32)] {
        match self.adjacency.get(node as usize) {
            Some(neighbors) => neighbors,
            None => &[],
        }
    }

    /// Number of neighbors of a node (out-neighbors for directed graphs).
    pub fn degree(&self, node: u32) -> usize {
        self.neighbors(node).len()
    }

    /// Sum of a node's edge weights.
    pub fn weighted_degree(&self, node: u32) -> f64 {
        self.neighbors(node).iter().map(|&(_, w)| f64::from(w)).sum()
    }

    /// Whether `from -> to` is an edge. `O(log d)`.
    pub fn has_edge(&self, from: u32, to: u32) -> bool {
        self.neighbors(from)
            .binary_search_by_key(&to, |&(n, _)| n)
            .is_ok()
    }

    /// Weight of `from -> to`, if present.
    pub fn edge_weight(&self, from: u32, to: u32) -> Option<f32> {
        let neighbors = self.neighbors(from);
        neighbors
            .binary_search_by_key(&to, |&(n, _)| n)
            .ok()
            .map(|i| neighbors[i].1)
    }

    /// Identifier of the node at `index`.
    pub fn node_id(&self, index: u32) -> Option<&NodeId> {
        self.graph.node_weight(NodeIndex::new(index as usize))
    }

    /// Dense index of a node identifier.
    pub fn index_of(&self, id: &NodeId) -> Option<u32> {
        self.node_index.get(id).map(|idx| idx.index() as u32)
    }

    /// All node indices, in first-appearance order of the edge stream.
    pub fn node_indices(&self) -> std::ops::Range<u32> {
        0..self.adjacency.len() as u32
    }

    /// All node identifiers, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.graph.node_weights()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph is directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Summary counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count,
            arc_count: self.graph.edge_count(),
            directed: self.directed,
        }
    }

    /// Access the underlying petgraph structure.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, f32> {
        &self.graph
    }
}

fn validate_record(record: &EdgeRecord) -> Result<()> {
    for (role, id) in [("source", &record.source), ("target", &record.target)] {
        if !NodeId::is_valid_token(id.as_str()) {
            return Err(Error::MalformedEdge {
                line: record.line,
                reason: format!("invalid {role} node identifier {:?}", id.as_str()),
            });
        }
    }
    if let Some(w) = record.weight {
        if !w.is_finite() || w <= 0.0 {
            return Err(Error::MalformedEdge {
                line: record.line,
                reason: format!("edge weight must be finite and positive, got {w}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(g: &Graph, id: &str) -> u32 {
        g.index_of(&NodeId::from(id)).unwrap()
    }

    #[test]
    fn test_undirected_stores_both_directions() {
        let g = Graph::from_edges([("a", "b"), ("b", "c")], false).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.stats().arc_count, 4);
        assert!(g.has_edge(idx(&g, "b"), idx(&g, "a")));
        assert_eq!(g.degree(idx(&g, "b")), 2);
    }

    #[test]
    fn test_directed_keeps_orientation() {
        let g = Graph::from_edges([("a", "b")], true).unwrap();
        assert!(g.has_edge(idx(&g, "a"), idx(&g, "b")));
        assert!(!g.has_edge(idx(&g, "b"), idx(&g, "a")));
        assert_eq!(g.degree(idx(&g, "b")), 0);
    }

    #[test]
    fn test_duplicate_edges_sum_weights() {
        let g = Graph::from_edges([("a", "b"), ("b", "a"), ("a", "b")], false).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(idx(&g, "a"), idx(&g, "b")), Some(3.0));
        assert_eq!(g.edge_weight(idx(&g, "b"), idx(&g, "a")), Some(3.0));

        let g = Graph::from_weighted_edges([("a", "b", 0.5), ("a", "b", 2.0)], true).unwrap();
        assert_eq!(g.edge_weight(idx(&g, "a"), idx(&g, "b")), Some(2.5));
    }

    #[test]
    fn test_weighted_degree() {
        let edges = [("a", "b", 0.5), ("a", "c", 2.0), ("b", "c", 1.0)];
        let g = Graph::from_weighted_edges(edges, false).unwrap();
        assert_eq!(g.weighted_degree(idx(&g, "a")), 2.5);
        assert_eq!(g.weighted_degree(idx(&g, "c")), 3.0);

        let g = Graph::from_weighted_edges(edges, true).unwrap();
        // Out-edges only.
        assert_eq!(g.weighted_degree(idx(&g, "c")), 0.0);
        assert_eq!(g.degree(idx(&g, "a")), 2);
    }

    #[test]
    fn test_self_loop_stored_once() {
        let g = Graph::from_edges([("a", "a"), ("a", "b")], false).unwrap();
        assert_eq!(g.degree(idx(&g, "a")), 2);
        assert_eq!(g.degree(idx(&g, "b")), 1);
    }

    #[test]
    fn test_neighbors_sorted_and_known() {
        let g = Graph::from_edges([("x", "c"), ("x", "a"), ("x", "b")], false).unwrap();
        let neighbors: Vec<u32> = g.neighbors(idx(&g, "x")).iter().map(|&(n, _)| n).collect();
        let mut sorted = neighbors.clone();
        sorted.sort_unstable();
        assert_eq!(neighbors, sorted);
        assert!(neighbors.iter().all(|&n| (n as usize) < g.node_count()));
    }

    #[test]
    fn test_builder_keeps_isolated_nodes() {
        let mut builder = GraphBuilder::new(false);
        let lonely = builder.add_node("lonely").unwrap();
        builder.add_edge(EdgeRecord::new(1, "a", "b")).unwrap();
        builder.add_edge(EdgeRecord::new(2, "b", "a")).unwrap();
        assert_eq!(builder.edge_count(), 1);
        assert!(builder.add_node("two words").is_err());

        let g = builder.build().unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.degree(lonely), 0);
        assert_eq!(g.node_id(lonely), Some(&NodeId::from("lonely")));
    }

    #[test]
    fn test_isolated_nodes_alone_are_empty() {
        let mut builder = GraphBuilder::new(false);
        builder.add_node("x").unwrap();
        assert!(matches!(builder.build(), Err(Error::EmptyGraph)));
    }

    #[test]
    fn test_empty_stream_is_error() {
        let err = Graph::load(std::iter::empty(), false).unwrap_err();
        assert!(matches!(err, Error::EmptyGraph));
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let err = Graph::from_weighted_edges([("a", "b", f32::NAN)], false).unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { line: 1, .. }));
        let err = Graph::from_weighted_edges([("a", "b", 0.0)], false).unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { .. }));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let err = Graph::from_edges([("a", "b"), ("c", "")], false).unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { line: 2, .. }));
    }

    #[test]
    fn test_petgraph_view_matches_adjacency() {
        let g = Graph::from_edges([("1", "2"), ("2", "3"), ("3", "1")], false).unwrap();
        let pg = g.as_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 6);
        for v in g.node_indices() {
            assert_eq!(pg.neighbors(NodeIndex::new(v as usize)).count(), g.degree(v));
        }
    }
}
