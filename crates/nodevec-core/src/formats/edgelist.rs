//! Comma-separated edge lists.
//!
//! One edge per line, no header: `source,target` or `source,target,weight`.
//! Whitespace around fields is trimmed and blank lines are skipped.

use crate::{EdgeRecord, Error, Graph, NodeId, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Edge-list format handler.
pub struct EdgeList;

impl EdgeList {
    /// Stream edge records from a reader.
    ///
    /// Each item is either a parsed record or the error for that line; the
    /// iterator does not stop on errors, callers decide.
    pub fn records<R: Read>(reader: R) -> impl Iterator<Item = Result<EdgeRecord>> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        reader.into_records().filter_map(|result| {
            let record = match result {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            // Whitespace-only lines trim down to a single empty field.
            if record.iter().all(str::is_empty) {
                return None;
            }
            let line = record
                .position()
                .map_or(0, |pos| pos.line() as usize);
            Some(parse_record(line, &record))
        })
    }

    /// Read a graph from an edge list.
    pub fn read<R: Read>(reader: R, directed: bool) -> Result<Graph> {
        Graph::load(Self::records(reader), directed)
    }

    /// Read a graph from an edge-list file.
    pub fn read_path(path: impl AsRef<Path>, directed: bool) -> Result<Graph> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), directed)
    }
}

fn parse_record(line: usize, record: &csv::StringRecord) -> Result<EdgeRecord> {
    let malformed = |reason: String| Error::MalformedEdge { line, reason };

    if record.len() < 2 || record.len() > 3 {
        return Err(malformed(format!(
            "expected `source,target[,weight]`, found {} field(s)",
            record.len()
        )));
    }

    let source = &record[0];
    let target = &record[1];
    if !NodeId::is_valid_token(source) {
        return Err(malformed(format!("invalid source identifier {source:?}")));
    }
    if !NodeId::is_valid_token(target) {
        return Err(malformed(format!("invalid target identifier {target:?}")));
    }

    let mut edge = EdgeRecord::new(line, source, target);
    if let Some(raw) = record.get(2) {
        let weight: f32 = raw
            .parse()
            .map_err(|_| malformed(format!("unparseable weight {raw:?}")))?;
        edge = edge.with_weight(weight);
    }
    Ok(edge)
}
