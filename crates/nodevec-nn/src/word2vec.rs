//! The word2vec text format.
//!
//! ```text
//! <node_count> <dim>
//! <id> <v1> <v2> ... <vdim>
//! ```
//!
//! Values are written with six fractional digits.

use crate::{Embeddings, Error, Result};
use nodevec_core::NodeId;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl Embeddings {
    /// Serialise in word2vec text format.
    pub fn write_word2vec<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{} {}", self.len(), self.dim())?;
        for (id, vector) in self.iter() {
            write!(writer, "{id}")?;
            for v in vector {
                write!(writer, " {v:.6}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write to `path` atomically.
    ///
    /// The file is staged next to its destination and renamed into place, so
    /// `path` either keeps its old contents or holds the complete new table.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        self.write_word2vec(BufWriter::new(staged.as_file_mut()))?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Parse the word2vec text format.
    pub fn read_word2vec<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|l| (i + 1, l)))
            .filter(|line| !matches!(line, Ok((_, l)) if l.trim().is_empty()));

        let Some(header) = lines.next() else {
            return Err(malformed(1, "missing header"));
        };
        let (line_no, header) = header?;
        let (rows, dim) = parse_header(&header).ok_or_else(|| {
            malformed(line_no, format!("expected `<count> <dim>`, found {header:?}"))
        })?;
        if dim == 0 {
            return Err(malformed(line_no, "dimension must be positive"));
        }

        let mut nodes = Vec::with_capacity(rows);
        let mut vectors = Vec::with_capacity(rows * dim);
        let mut seen = std::collections::HashSet::with_capacity(rows);
        let mut last_line = line_no;
        for line in lines {
            let (line_no, line) = line?;
            last_line = line_no;
            if nodes.len() == rows {
                return Err(malformed(line_no, format!("more than {rows} rows")));
            }

            let mut fields = line.split_whitespace();
            let Some(id) = fields.next() else { continue };
            let start = vectors.len();
            for field in fields {
                let v: f32 = field
                    .parse()
                    .map_err(|_| malformed(line_no, format!("unparseable value {field:?}")))?;
                vectors.push(v);
            }
            let found = vectors.len() - start;
            if found != dim {
                return Err(malformed(
                    line_no,
                    format!("expected {dim} values, found {found}"),
                ));
            }
            if !seen.insert(id.to_string()) {
                return Err(malformed(line_no, format!("duplicate node {id:?}")));
            }
            nodes.push(NodeId::from(id));
        }

        if nodes.len() != rows {
            return Err(malformed(
                last_line,
                format!("header declares {rows} rows, found {}", nodes.len()),
            ));
        }
        Embeddings::new(nodes, dim, vectors)
    }

    /// Read from a file written by [`Embeddings::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_word2vec(BufReader::new(file))
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let rows = fields.next()?.parse().ok()?;
    let dim = fields.next()?.parse().ok()?;
    fields.next().is_none().then_some((rows, dim))
}

fn malformed(line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedEmbedding {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Embeddings {
        let nodes = vec![NodeId::from("7"), NodeId::from("3")];
        Embeddings::new(nodes, 3, vec![0.5, -0.25, 1.0, 0.0, 0.125, -2.0]).unwrap()
    }

    fn line_of(err: Error) -> usize {
        match err {
            Error::MalformedEmbedding { line, .. } => line,
            other => panic!("expected MalformedEmbedding, got {other:?}"),
        }
    }

    #[test]
    fn test_text_layout() {
        let mut buf = Vec::new();
        sample().write_word2vec(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "2 3\n7 0.500000 -0.250000 1.000000\n3 0.000000 0.125000 -2.000000\n"
        );
    }

    #[test]
    fn test_read_back() {
        let mut buf = Vec::new();
        let original = sample();
        original.write_word2vec(&mut buf).unwrap();
        let parsed = Embeddings::read_word2vec(buf.as_slice()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_bad_header() {
        let err = Embeddings::read_word2vec("two 3\n".as_bytes()).unwrap_err();
        assert_eq!(line_of(err), 1);
        let err = Embeddings::read_word2vec("".as_bytes()).unwrap_err();
        assert_eq!(line_of(err), 1);
    }

    #[test]
    fn test_wrong_width_reports_line() {
        let text = "2 2\na 1.0 2.0\nb 1.0\n";
        let err = Embeddings::read_word2vec(text.as_bytes()).unwrap_err();
        assert_eq!(line_of(err), 3);
    }

    #[test]
    fn test_bad_value_and_duplicates() {
        let err = Embeddings::read_word2vec("1 1\na x\n".as_bytes()).unwrap_err();
        assert_eq!(line_of(err), 2);
        let err = Embeddings::read_word2vec("2 1\na 1\na 2\n".as_bytes()).unwrap_err();
        assert_eq!(line_of(err), 3);
    }

    #[test]
    fn test_row_count_mismatch() {
        assert!(Embeddings::read_word2vec("3 1\na 1\nb 2\n".as_bytes()).is_err());
        assert!(Embeddings::read_word2vec("1 1\na 1\nb 2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.emb");
        let original = sample();
        original.save(&path).unwrap();
        assert_eq!(Embeddings::load(&path).unwrap(), original);

        // Leaves no staging files behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
