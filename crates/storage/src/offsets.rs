//! Offset index for random access into built artifacts
//!
//! `doc_offsets[i]` is the byte position in the document file right after
//! record `i - 1` was written, so record `i` spans
//! `doc_offsets[i]..doc_offsets[i + 1]`. The same holds for `token_offsets`.
//! Both sequences start at 0 and hold one entry more than there are records.
//!
//! On disk the index is a single framed record holding the pair
//! `(doc_offsets, token_offsets)`.

use crate::record::{read_value_from_file, write_value_to_file};
use corpora_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cumulative byte offsets for the document and token files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetIndex {
    doc_offsets: Vec<u64>,
    token_offsets: Vec<u64>,
}

impl Default for OffsetIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetIndex {
    /// An index describing zero records
    pub fn new() -> Self {
        OffsetIndex {
            doc_offsets: vec![0],
            token_offsets: vec![0],
        }
    }

    /// Build from raw sequences, checking the invariants.
    pub fn from_parts(doc_offsets: Vec<u64>, token_offsets: Vec<u64>) -> Result<Self> {
        let index = OffsetIndex {
            doc_offsets,
            token_offsets,
        };
        index.validate()?;
        Ok(index)
    }

    /// Record the positions reached after writing one more record.
    pub fn push(&mut self, doc_position: u64, token_position: u64) {
        self.doc_offsets.push(doc_position);
        self.token_offsets.push(token_position);
    }

    /// Number of records described
    pub fn len(&self) -> usize {
        self.doc_offsets.len().saturating_sub(1)
    }

    /// True if no records are described
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document offsets, `len() + 1` entries
    pub fn doc_offsets(&self) -> &[u64] {
        &self.doc_offsets
    }

    /// Token offsets, `len() + 1` entries
    pub fn token_offsets(&self) -> &[u64] {
        &self.token_offsets
    }

    /// Byte range of document record `i`
    pub fn document_span(&self, i: usize) -> Option<(u64, u64)> {
        span(&self.doc_offsets, i)
    }

    /// Byte range of token record `i`
    pub fn token_span(&self, i: usize) -> Option<(u64, u64)> {
        span(&self.token_offsets, i)
    }

    /// Check that both sequences start at 0, never decrease, and have equal length.
    pub fn validate(&self) -> Result<()> {
        if self.doc_offsets.len() != self.token_offsets.len() {
            return Err(Error::corrupt(
                0,
                format!(
                    "offset length mismatch: {} document offsets, {} token offsets",
                    self.doc_offsets.len(),
                    self.token_offsets.len()
                ),
            ));
        }
        check_sequence("document", &self.doc_offsets)?;
        check_sequence("token", &self.token_offsets)
    }

    /// Write the index as one framed `(doc_offsets, token_offsets)` record.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<u64> {
        write_value_to_file(path, &(&self.doc_offsets, &self.token_offsets))
    }

    /// Read and validate an index written by [`OffsetIndex::write_to`].
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let (doc_offsets, token_offsets): (Vec<u64>, Vec<u64>) = read_value_from_file(path)?;
        Self::from_parts(doc_offsets, token_offsets)
    }
}

fn span(offsets: &[u64], i: usize) -> Option<(u64, u64)> {
    let start = *offsets.get(i)?;
    let end = *offsets.get(i + 1)?;
    Some((start, end))
}

fn check_sequence(name: &str, offsets: &[u64]) -> Result<()> {
    match offsets.first() {
        Some(0) => {}
        _ => {
            return Err(Error::corrupt(
                0,
                format!("{} offsets must start at 0", name),
            ))
        }
    }
    if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::corrupt(
            0,
            format!("{} offsets decrease at entry {}", name, i + 1),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_is_empty() {
        let index = OffsetIndex::new();
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert_eq!(index.doc_offsets(), &[0]);
        assert_eq!(index.token_offsets(), &[0]);
        assert!(index.document_span(0).is_none());
    }

    #[test]
    fn test_spans() {
        let mut index = OffsetIndex::new();
        index.push(10, 4);
        index.push(25, 4);
        assert_eq!(index.len(), 2);
        assert_eq!(index.document_span(0), Some((0, 10)));
        assert_eq!(index.document_span(1), Some((10, 25)));
        assert_eq!(index.token_span(1), Some((4, 4)));
        assert_eq!(index.document_span(2), None);
    }

    #[test]
    fn test_validate_rejects_bad_sequences() {
        assert!(OffsetIndex::from_parts(vec![1, 2], vec![0, 1]).is_err());
        assert!(OffsetIndex::from_parts(vec![0, 5, 3], vec![0, 1, 2]).is_err());
        assert!(OffsetIndex::from_parts(vec![0, 1], vec![0]).is_err());
        assert!(OffsetIndex::from_parts(vec![], vec![]).is_err());
        assert!(OffsetIndex::from_parts(vec![0, 0, 7], vec![0, 3, 3]).is_ok());
    }

    #[test]
    fn test_write_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.idx");

        let mut index = OffsetIndex::new();
        index.push(12, 9);
        index.push(30, 9);
        index.write_to(&path).unwrap();

        assert_eq!(OffsetIndex::read_from(&path).unwrap(), index);
    }

    proptest! {
        #[test]
        fn pushing_growing_positions_stays_valid(steps in proptest::collection::vec((0u64..100, 0u64..100), 0..50)) {
            let mut index = OffsetIndex::new();
            let (mut doc, mut tok) = (0u64, 0u64);
            for (d, t) in &steps {
                doc += d;
                tok += t;
                index.push(doc, tok);
            }
            prop_assert!(index.validate().is_ok());
            prop_assert_eq!(index.len(), steps.len());
            prop_assert_eq!(index.doc_offsets().len(), steps.len() + 1);
        }
    }
}
