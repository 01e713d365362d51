//! Single-pass indexed build
//!
//! Turns one raw text file into three correlated artifacts in exactly one
//! pass over the input:
//!
//! 1. Build a vocabulary from the input file
//! 2. Create the document, token and index files (truncating old content)
//! 3. For each line: append the raw line to the document file, append its
//!    token indices to the token file, record both byte positions
//! 4. Write the offset index and flush everything
//!
//! # Failure Policy
//!
//! Any write failure aborts with `IoWrite` naming the artifact. Files
//! written so far are left in place and must be discarded by the caller.

use crate::paths::BuildArtifacts;
use corpora_core::{Result, TokenId};
use corpora_storage::lines::try_for_each_line;
use corpora_storage::{OffsetIndex, RecordWriter};
use corpora_vocab::{Vocabulary, VocabularyOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer that keeps the document and token files aligned with their offsets.
pub struct IndexedWriter {
    documents: RecordWriter,
    tokens: RecordWriter,
    index: RecordWriter,
    offsets: OffsetIndex,
}

impl IndexedWriter {
    /// Create all three artifacts, truncating existing content.
    pub fn create(artifacts: &BuildArtifacts) -> Result<Self> {
        Ok(IndexedWriter {
            documents: RecordWriter::create(&artifacts.documents)?,
            tokens: RecordWriter::create(&artifacts.tokens)?,
            index: RecordWriter::create(&artifacts.index)?,
            offsets: OffsetIndex::new(),
        })
    }

    /// Number of records appended so far
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if nothing was appended yet
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Append one document and its token indices.
    pub fn append(&mut self, line: &str, tokens: &[TokenId]) -> Result<()> {
        let doc_position = self.documents.append(line)?;
        let token_position = self.tokens.append(tokens)?;
        self.offsets.push(doc_position, token_position);
        Ok(())
    }

    /// Write the offset index, flush all three files, and return the index.
    pub fn finish(mut self) -> Result<OffsetIndex> {
        self.index
            .append(&(self.offsets.doc_offsets(), self.offsets.token_offsets()))?;
        self.documents.finish()?;
        self.tokens.finish()?;
        self.index.finish()?;
        Ok(self.offsets)
    }
}

/// Everything produced by [`build_indexed`]
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Vocabulary built from the input
    pub vocabulary: Vocabulary,
    /// Offset index written to the index artifact
    pub index: OffsetIndex,
    /// Where the artifacts were written
    pub artifacts: BuildArtifacts,
    /// The raw input file
    pub input: PathBuf,
}

impl BuildOutput {
    /// Number of documents written
    pub fn document_count(&self) -> usize {
        self.index.len()
    }
}

/// Build a vocabulary from `input` and write the three indexed artifacts.
pub fn build_indexed(
    input: impl AsRef<Path>,
    artifacts: &BuildArtifacts,
    options: &VocabularyOptions,
) -> Result<BuildOutput> {
    let input = input.as_ref();
    let vocabulary = Vocabulary::build_from_file(input, options)?;
    let index = write_indexed(input, artifacts, &vocabulary)?;
    Ok(BuildOutput {
        vocabulary,
        index,
        artifacts: artifacts.clone(),
        input: input.to_path_buf(),
    })
}

/// Write the indexed artifacts for `input` against an existing vocabulary.
pub fn write_indexed(
    input: impl AsRef<Path>,
    artifacts: &BuildArtifacts,
    vocabulary: &Vocabulary,
) -> Result<OffsetIndex> {
    let input = input.as_ref();
    let mut writer = IndexedWriter::create(artifacts)?;
    debug!(
        input = %input.display(),
        documents = %artifacts.documents.display(),
        "Writing indexed artifacts"
    );

    try_for_each_line(input, |_, line| {
        let tokens = vocabulary.tokenize(&line);
        writer.append(&line, &tokens)
    })?;

    let index = writer.finish()?;
    info!(
        input = %input.display(),
        documents = index.len(),
        document_bytes = index.doc_offsets().last().copied().unwrap_or(0),
        token_bytes = index.token_offsets().last().copied().unwrap_or(0),
        "Indexed build complete"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpora_storage::record::map_records;
    use tempfile::TempDir;

    #[test]
    fn test_writer_tracks_offsets() {
        let dir = TempDir::new().unwrap();
        let artifacts = BuildArtifacts::from_base(dir.path().join("out"));

        let mut writer = IndexedWriter::create(&artifacts).unwrap();
        assert!(writer.is_empty());
        writer.append("a b", &[0, 1]).unwrap();
        writer.append("", &[]).unwrap();
        assert_eq!(writer.len(), 2);
        let index = writer.finish().unwrap();

        assert_eq!(index.len(), 2);
        let doc_len = std::fs::metadata(&artifacts.documents).unwrap().len();
        let tok_len = std::fs::metadata(&artifacts.tokens).unwrap().len();
        assert_eq!(index.doc_offsets()[2], doc_len);
        assert_eq!(index.token_offsets()[2], tok_len);
        assert_eq!(OffsetIndex::read_from(&artifacts.index).unwrap(), index);
    }

    #[test]
    fn test_write_indexed_uses_vocabulary() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("corpus.txt");
        std::fs::write(&input, "the cat sat on the dog\nno match\n").unwrap();
        let artifacts = BuildArtifacts::from_base(dir.path().join("out"));
        let vocab = Vocabulary::from_words(["cat", "dog"]).unwrap();

        write_indexed(&input, &artifacts, &vocab).unwrap();

        let tokens = map_records(&artifacts.tokens, |_, t: Vec<TokenId>| t).unwrap();
        assert_eq!(tokens, vec![vec![0, 1], vec![]]);
        let docs = map_records(&artifacts.documents, |_, d: String| d).unwrap();
        assert_eq!(docs, vec!["the cat sat on the dog", "no match"]);
    }
}
