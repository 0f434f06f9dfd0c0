//! Edge list in, embeddings out.

use approx::assert_abs_diff_eq;
use nodevec::{embed_edge_file, fit, EdgeList, Embeddings, Error, Graph, Node2VecConfig};
use std::collections::HashMap;
use std::fs;

fn small_config() -> Node2VecConfig {
    Node2VecConfig {
        dimension: 16,
        num_walks: 50,
        walk_length: 10,
        p: 1.0,
        q: 1.0,
        window: 2,
        epochs: 5,
        workers: 1,
        ..Default::default()
    }
}

#[test]
fn path_graph_middle_nodes_are_visited_more_and_embed_closer() {
    let graph = EdgeList::read("1,2\n2,3\n3,4\n".as_bytes(), false).unwrap();
    let config = small_config();

    let walks = nodevec_core::generate_walks(&graph, config.walk_config()).unwrap();
    let mut visits: HashMap<&str, usize> = HashMap::new();
    for &v in walks.iter().flatten() {
        *visits.entry(graph.node_id(v).unwrap().as_str()).or_default() += 1;
    }
    for inner in ["2", "3"] {
        for outer in ["1", "4"] {
            assert!(
                visits[inner] > visits[outer],
                "{inner} visited {} times, {outer} {} times",
                visits[inner],
                visits[outer]
            );
        }
    }

    let (embeddings, report) = fit(&graph, &config).unwrap();
    assert_eq!(report.anomalies, 0);
    let inner = embeddings.cosine_similarity("2", "3").unwrap();
    let outer = embeddings.cosine_similarity("1", "4").unwrap();
    assert!(inner > outer, "cos(2,3) = {inner}, cos(1,4) = {outer}");
}

#[test]
fn malformed_edge_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("edges.csv");
    let output = dir.path().join("out.emb");
    fs::write(&input, "a,\n").unwrap();

    let err = embed_edge_file(&input, &output, &small_config()).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Core(nodevec_core::Error::MalformedEdge { line: 1, .. })
        ),
        "unexpected error: {err:?}"
    );
    assert!(!output.exists());
}

#[test]
fn empty_edge_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("edges.csv");
    let output = dir.path().join("out.emb");
    fs::write(&input, "\n").unwrap();

    let err = embed_edge_file(&input, &output, &small_config()).unwrap_err();
    assert!(matches!(err, Error::Core(nodevec_core::Error::EmptyGraph)));
    assert!(!output.exists());
}

#[test]
fn isolated_node_gets_no_vector() {
    let mut builder = nodevec::GraphBuilder::new(false);
    builder.add_node("lonely").unwrap();
    for (s, t) in [("a", "b"), ("b", "c"), ("c", "a")] {
        builder.add_edge(nodevec::EdgeRecord::new(0, s, t)).unwrap();
    }
    let graph = builder.build().unwrap();
    assert_eq!(graph.node_count(), 4);

    let config = Node2VecConfig {
        dimension: 12,
        ..small_config()
    };
    let (embeddings, _) = fit(&graph, &config).unwrap();
    assert_eq!(embeddings.len(), 3);
    assert!(!embeddings.contains("lonely"));
    assert!(matches!(
        embeddings.get("lonely"),
        Err(nodevec_nn::Error::UnknownNode(_))
    ));
    for id in ["a", "b", "c"] {
        assert_eq!(embeddings.get(id).unwrap().len(), 12);
    }

    let mut buf = Vec::new();
    embeddings.write_word2vec(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("3 12\n"));
    assert!(!text.contains("lonely"));
}

#[test]
fn edge_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("edges.csv");
    let output = dir.path().join("nested").join("out.emb");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&input, "1,2\n2,3,2.5\n3,1\n3,4\n").unwrap();

    let report = embed_edge_file(&input, &output, &small_config()).unwrap();
    assert_eq!(report.epochs, 5);
    assert!(report.pairs > 0);

    let loaded = Embeddings::load(&output).unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.dim(), 16);

    // Same seed, one worker: the file holds exactly what `fit` learns,
    // up to the six printed decimals.
    let graph = EdgeList::read_path(&input, false).unwrap();
    let (trained, _) = fit(&graph, &small_config()).unwrap();
    assert_eq!(loaded.nodes(), trained.nodes());
    for ((_, saved), (_, fresh)) in loaded.iter().zip(trained.iter()) {
        for (x, y) in saved.iter().zip(fresh) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    let graph = Graph::from_edges([("1", "2")], false).unwrap();
    let bad = Node2VecConfig {
        p: -1.0,
        ..small_config()
    };
    assert!(fit(&graph, &bad).is_err());
}

#[test]
fn same_seed_single_worker_is_reproducible() {
    let graph = EdgeList::read("1,2\n2,3\n3,4\n4,1\n1,3\n".as_bytes(), false).unwrap();
    let config = Node2VecConfig {
        p: 0.3,
        ..small_config()
    };
    let (a, _) = fit(&graph, &config).unwrap();
    let (b, _) = fit(&graph, &config).unwrap();
    assert_eq!(a, b);

    let reseeded = Node2VecConfig {
        seed: 7,
        ..config
    };
    let (c, _) = fit(&graph, &reseeded).unwrap();
    assert_ne!(a, c);
}
