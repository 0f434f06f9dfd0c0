//! Karate Club Demo
//!
//! Embeds Zachary's karate club network and prints each faction leader's
//! nearest members.
//!
//! ```bash
//! RUST_LOG=info cargo run --example karate_club [-- out.emb]
//! ```

use anyhow::Context;
use nodevec::{fit, EdgeList, Node2VecConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// Adjacency of the 34-member club, each edge listed once from its lower id.
const CLUB: &[(u32, &[u32])] = &[
    (1, &[2, 3, 4, 5, 6, 7, 8, 9, 11, 12, 13, 14, 18, 20, 22, 32]),
    (2, &[3, 4, 8, 14, 18, 20, 22, 31]),
    (3, &[4, 8, 9, 10, 14, 28, 29, 33]),
    (4, &[8, 13, 14]),
    (5, &[7, 11]),
    (6, &[7, 11, 17]),
    (7, &[17]),
    (9, &[31, 33, 34]),
    (10, &[34]),
    (14, &[34]),
    (15, &[33, 34]),
    (16, &[33, 34]),
    (19, &[33, 34]),
    (20, &[34]),
    (21, &[33, 34]),
    (23, &[33, 34]),
    (24, &[26, 28, 30, 33, 34]),
    (25, &[26, 28, 32]),
    (26, &[32]),
    (27, &[30, 34]),
    (28, &[34]),
    (29, &[32, 34]),
    (30, &[33, 34]),
    (31, &[33, 34]),
    (32, &[33, 34]),
    (33, &[34]),
];

fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let edges: String = CLUB
        .iter()
        .flat_map(|&(s, targets)| targets.iter().map(move |t| format!("{s},{t}\n")))
        .collect();
    let graph = EdgeList::read(edges.as_bytes(), false).context("parsing club edges")?;
    let stats = graph.stats();
    println!("Karate Club: {} members, {} ties\n", stats.node_count, stats.edge_count);

    let config = Node2VecConfig {
        dimension: 32,
        window: 5,
        epochs: 5,
        ..Default::default()
    };
    let (embeddings, report) = fit(&graph, &config).context("training embeddings")?;
    println!(
        "Trained {} epochs over {} pairs (final loss {:.4})\n",
        report.epochs,
        report.pairs,
        report.epoch_losses.last().copied().unwrap_or_default()
    );

    // Instructor (1) and administrator (34) led the two factions.
    for leader in ["1", "34"] {
        println!("Closest to {leader}:");
        for (member, score) in embeddings.most_similar(leader, 5)? {
            println!("  {member:>3}  {score:.3}");
        }
        println!();
    }

    if let Some(path) = std::env::args().nth(1) {
        embeddings
            .save(&path)
            .with_context(|| format!("writing {path}"))?;
        println!("Wrote {} vectors to {path}", embeddings.len());
    }
    Ok(())
}
