//! Property-based tests for the vocabulary and the embedding text format.
//!
//! - Vocabulary size equals the number of distinct nodes across the walks
//! - Written embeddings parse back to the same vectors within 1e-6

use nodevec_core::{Graph, NodeId};
use nodevec_nn::{Embeddings, Vocabulary};
use proptest::prelude::*;
use std::collections::HashSet;

fn chain(n: usize) -> Graph {
    let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    Graph::from_edges(ids.windows(2).map(|w| (w[0].clone(), w[1].clone())), false).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn vocab_size_matches_distinct_walked_nodes(
        walks in prop::collection::vec(prop::collection::vec(0u32..10, 1..12), 1..20),
    ) {
        let g = chain(10);
        let vocab = Vocabulary::build(&g, &walks).unwrap();
        let distinct: HashSet<u32> = walks.iter().flatten().copied().collect();
        prop_assert_eq!(vocab.len(), distinct.len());

        let total: usize = walks.iter().map(Vec::len).sum();
        prop_assert_eq!(vocab.total_tokens(), total as u64);
        for i in 1..vocab.len() as u32 {
            prop_assert!(vocab.count(i - 1) >= vocab.count(i));
        }
    }

    #[test]
    fn word2vec_text_is_lossless_to_six_places(
        rows in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 4), 1..16),
    ) {
        let nodes: Vec<NodeId> = (0..rows.len()).map(|i| NodeId::from(i as u64)).collect();
        let vectors: Vec<f32> = rows.iter().flatten().copied().collect();
        let original = Embeddings::new(nodes, 4, vectors).unwrap();

        let mut buf = Vec::new();
        original.write_word2vec(&mut buf).unwrap();
        let parsed = Embeddings::read_word2vec(buf.as_slice()).unwrap();

        prop_assert_eq!(parsed.nodes(), original.nodes());
        for ((_, a), (_, b)) in parsed.iter().zip(original.iter()) {
            for (x, y) in a.iter().zip(b) {
                prop_assert!((x - y).abs() <= 1e-6 * (1.0 + y.abs()), "{} vs {}", x, y);
            }
        }
    }
}
