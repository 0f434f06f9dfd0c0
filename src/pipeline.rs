//! Edge list to embeddings, end to end.

use crate::{Node2VecConfig, Result};
use nodevec_core::formats::EdgeList;
use nodevec_core::{generate_walks, Graph};
use nodevec_nn::{Embeddings, SkipGram, TrainReport, Vocabulary};
use std::path::Path;
use tracing::info;

/// Learn embeddings for every node of `graph` that appears in a walk.
///
/// Nodes without neighbors root no walk and get no vector.
pub fn fit(graph: &Graph, config: &Node2VecConfig) -> Result<(Embeddings, TrainReport)> {
    config.validate()?;

    let walks = generate_walks(graph, config.walk_config())?;
    let vocab = Vocabulary::build(graph, &walks)?;
    info!(
        vocabulary = vocab.len(),
        tokens = vocab.total_tokens(),
        "built vocabulary"
    );
    let corpus = vocab.encode(&walks);
    drop(walks);

    let mut model = SkipGram::new(vocab.len(), config.skipgram_config())?;
    let report = model.train(&corpus, &vocab)?;
    let embeddings = model.into_embeddings(vocab)?;
    Ok((embeddings, report))
}

/// Read an edge list, learn embeddings and write them in word2vec format.
///
/// `output` is only created once training has succeeded; any failure
/// before that leaves it untouched.
pub fn embed_edge_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &Node2VecConfig,
) -> Result<TrainReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    config.validate()?;

    let graph = EdgeList::read_path(input, config.directed)?;
    let stats = graph.stats();
    info!(
        path = %input.display(),
        nodes = stats.node_count,
        edges = stats.edge_count,
        directed = stats.directed,
        "loaded graph"
    );

    let (embeddings, report) = fit(&graph, config)?;
    embeddings.save(output)?;
    info!(
        path = %output.display(),
        nodes = embeddings.len(),
        dimension = embeddings.dim(),
        "wrote embeddings"
    );
    Ok(report)
}
