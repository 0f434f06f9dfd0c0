//! Property-based tests for graph loading and walk generation.
//!
//! These tests verify invariants that should hold for any graph:
//! - Every walk step follows a real edge
//! - Walk length never exceeds the configured maximum, and only falls short at a dead end
//! - Every neighbor is itself a node

use nodevec_core::algo::random_walk::{generate_walks, RandomWalkConfig};
use nodevec_core::Graph;
use proptest::prelude::*;

prop_compose! {
    fn arb_edges()(
        edges in prop::collection::vec((0u8..12, 0u8..12), 1..40),
    ) -> Vec<(String, String)> {
        edges.into_iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn neighbors_are_nodes(edges in arb_edges(), directed in any::<bool>()) {
        let g = Graph::from_edges(edges, directed).unwrap();
        for v in g.node_indices() {
            for &(n, w) in g.neighbors(v) {
                prop_assert!((n as usize) < g.node_count());
                prop_assert!(w >= 1.0);
            }
        }
    }

    #[test]
    fn walks_follow_edges(
        edges in arb_edges(),
        directed in any::<bool>(),
        p in 0.1f32..4.0,
        q in 0.1f32..4.0,
        seed in any::<u64>(),
    ) {
        let g = Graph::from_edges(edges, directed).unwrap();
        let config = RandomWalkConfig {
            walk_length: 15,
            num_walks: 2,
            p,
            q,
            seed,
            workers: 1,
        };
        let walks = generate_walks(&g, config).unwrap();
        let roots = g.node_indices().filter(|&v| g.degree(v) > 0).count();
        prop_assert_eq!(walks.len(), 2 * roots);

        for walk in &walks {
            prop_assert!(walk.len() >= 2);
            prop_assert!(walk.len() <= config.walk_length);
            for pair in walk.windows(2) {
                prop_assert!(g.has_edge(pair[0], pair[1]), "fabricated step {:?}", pair);
            }
            if walk.len() < config.walk_length {
                let last = *walk.last().unwrap();
                prop_assert_eq!(g.degree(last), 0, "walk stopped early at a node with neighbors");
            }
        }
    }
}
