//! Random access into built artifacts
//!
//! [`IndexedReader`] loads the offset index and seeks straight to record `i`
//! in the document or token file, instead of scanning from the start.

use corpora_core::{Error, Result, TokenId};
use corpora_durability::BuildArtifacts;
use corpora_storage::{FramedFormat, OffsetIndex, RecordFormat, RecordStream, TokenStream};
use tracing::debug;

/// Indexed, random-access view over one build's artifacts.
#[derive(Debug)]
pub struct IndexedReader {
    index: OffsetIndex,
    documents: RecordStream<FramedFormat<String>>,
    tokens: TokenStream,
}

impl IndexedReader {
    /// Load the index from `artifacts.index`. Data files open lazily.
    pub fn open(artifacts: &BuildArtifacts) -> Result<Self> {
        let index = OffsetIndex::read_from(&artifacts.index)?;
        debug!(
            index = %artifacts.index.display(),
            documents = index.len(),
            "Loaded offset index"
        );
        Ok(Self::with_index(artifacts, index))
    }

    /// Use an index already in memory.
    pub fn with_index(artifacts: &BuildArtifacts, index: OffsetIndex) -> Self {
        IndexedReader {
            index,
            documents: RecordStream::new("documents", Some(artifacts.documents.clone())),
            tokens: TokenStream::new("token", Some(artifacts.tokens.clone())),
        }
    }

    /// Apply a per-record size limit to both data files
    pub fn with_max_record_bytes(mut self, max: u32) -> Self {
        self.documents = self.documents.with_max_record_bytes(max);
        self.tokens = self.tokens.with_max_record_bytes(max);
        self
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if there are no documents
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The offset index
    pub fn index(&self) -> &OffsetIndex {
        &self.index
    }

    /// Document `i`, or `None` if `i` is past the end.
    pub fn document(&mut self, i: usize) -> Result<Option<String>> {
        match self.index.document_span(i) {
            Some((start, _)) => read_indexed(&mut self.documents, start).map(Some),
            None => Ok(None),
        }
    }

    /// Token indices of document `i`, or `None` if `i` is past the end.
    pub fn tokens(&mut self, i: usize) -> Result<Option<Vec<TokenId>>> {
        match self.index.token_span(i) {
            Some((start, _)) => read_indexed(&mut self.tokens, start).map(Some),
            None => Ok(None),
        }
    }

    /// Close both data files
    pub fn release(&mut self) {
        self.documents.release();
        self.tokens.release();
    }
}

fn read_indexed<T>(stream: &mut RecordStream<FramedFormat<T>>, offset: u64) -> Result<T>
where
    FramedFormat<T>: RecordFormat<Item = T>,
{
    stream.record_at(offset).map_err(|e| match e {
        Error::EndOfStream => Error::corrupt(offset, "index points past end of file"),
        other => other,
    })
}
