//! The corpus aggregate
//!
//! A [`Corpus`] ties a raw text file to its tokenized counterpart, an
//! optional vocabulary and a document count. Both files are read through
//! lazy streams: nothing is opened until needed, and handles are closed
//! when the corpus is dropped or [`Corpus::release`] is called.
//!
//! # Lifecycle
//!
//! ```text
//! Corpus::open(text)         bind text + derived token location
//!   build_vocabulary()       count words, keep admitted ones
//!   tokenize()               write one token record per line
//!   count_documents()        explicit, idempotent count
//!   save(path)               snapshot without handles
//! Corpus::load(path)         streams reopen on first read
//! ```

use crate::config::CorpusConfig;
use crate::reader::IndexedReader;
use crate::tokenize::tokenize_to_file;
use corpora_core::{Error, Result, TokenId};
use corpora_durability::{build_indexed, load_snapshot, save_snapshot, BuildArtifacts, CorpusSnapshot};
use corpora_storage::lines::{count_lines, try_for_each_line};
use corpora_storage::record::try_for_each_record_limited;
use corpora_storage::{DocumentStream, OffsetIndex, TokenStream};
use corpora_vocab::{Vocabulary, VocabularyOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A streamed text corpus
#[derive(Debug)]
pub struct Corpus {
    text_stream: DocumentStream,
    token_stream: TokenStream,
    vocabulary: Option<Vocabulary>,
    document_count: u64,
    config: CorpusConfig,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}

impl Corpus {
    /// An empty corpus with no backing files
    pub fn new() -> Self {
        Self::from_parts(None, None, CorpusConfig::default())
    }

    fn from_parts(text: Option<PathBuf>, token: Option<PathBuf>, config: CorpusConfig) -> Self {
        Corpus {
            text_stream: DocumentStream::new("text", text),
            token_stream: TokenStream::new("token", token)
                .with_max_record_bytes(config.max_record_bytes),
            vocabulary: None,
            document_count: 0,
            config,
        }
    }

    /// Bind a corpus to `text_location` with default configuration.
    pub fn open(text_location: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(text_location, CorpusConfig::default())
    }

    /// Bind a corpus to `text_location`; the token location is derived from
    /// it by appending the configured suffix.
    ///
    /// Both files are opened right away if they exist. Absence of either is
    /// tolerated; reads will fail with `Open` until the file appears.
    pub fn open_with_config(text_location: impl AsRef<Path>, config: CorpusConfig) -> Result<Self> {
        let text = text_location.as_ref().to_path_buf();
        let token = config.token_location_for(&text);
        Self::with_locations(text, token, config)
    }

    /// Bind a corpus to explicit text and token locations.
    pub fn with_locations(
        text_location: impl Into<PathBuf>,
        token_location: impl Into<PathBuf>,
        config: CorpusConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut corpus = Self::from_parts(
            Some(text_location.into()),
            Some(token_location.into()),
            config,
        );
        corpus.try_open_streams()?;
        Ok(corpus)
    }

    fn try_open_streams(&mut self) -> Result<()> {
        for (name, result) in [
            ("text", self.text_stream.open()),
            ("token", self.token_stream.open()),
        ] {
            match result {
                Ok(()) => {}
                Err(Error::Open { path, source }) => {
                    warn!(stream = name, path = %path.display(), error = %source, "Stream not available yet");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Raw text file location
    pub fn text_location(&self) -> Result<&Path> {
        self.text_stream.location()
    }

    /// Token file location
    pub fn token_location(&self) -> Result<&Path> {
        self.token_stream.location()
    }

    /// Bound vocabulary
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Bind a vocabulary built elsewhere
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = Some(vocabulary);
    }

    /// Document count as last counted or set
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Set the document count explicitly
    pub fn set_document_count(&mut self, count: u64) {
        self.document_count = count;
    }

    /// Count the lines of the text file and store the result.
    ///
    /// Reads through an independent pass; stream positions are untouched.
    pub fn count_documents(&mut self) -> Result<u64> {
        let count = count_lines(self.text_location()?)? as u64;
        self.document_count = count;
        Ok(count)
    }

    /// Configuration in use
    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// True if the text or token handle is open
    pub fn has_open_streams(&self) -> bool {
        self.text_stream.is_open() || self.token_stream.is_open()
    }

    // ========================================================================
    // Sequential reads
    // ========================================================================

    /// Read the next document from the text stream.
    pub fn next_document(&mut self) -> Result<String> {
        self.text_stream.next_record()
    }

    /// Read the next token record from the token stream.
    pub fn next_tokenized_document(&mut self) -> Result<Vec<TokenId>> {
        self.token_stream.next_record()
    }

    /// Seek both streams back to their start.
    pub fn reset_iterators(&mut self) -> Result<()> {
        self.text_stream.reset()?;
        self.token_stream.reset()
    }

    /// Close both handles now instead of waiting for drop.
    pub fn release(&mut self) {
        self.text_stream.release();
        self.token_stream.release();
    }

    // ========================================================================
    // Independent passes
    // ========================================================================

    /// Call `f(index, document)` for every document, stopping at the first error.
    pub fn try_for_each_document<F>(&self, f: F) -> Result<usize>
    where
        F: FnMut(usize, String) -> Result<()>,
    {
        try_for_each_line(self.text_location()?, f)
    }

    /// Call `f(index, document)` for every document in file order.
    pub fn for_each_document<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(usize, String),
    {
        self.try_for_each_document(|i, doc| {
            f(i, doc);
            Ok(())
        })
    }

    /// Collect `f(index, document)` over every document.
    pub fn map_documents<U, F>(&self, mut f: F) -> Result<Vec<U>>
    where
        F: FnMut(usize, String) -> U,
    {
        let mut out = Vec::new();
        self.for_each_document(|i, doc| out.push(f(i, doc)))?;
        Ok(out)
    }

    /// Call `f(index, tokens)` for every token record, stopping at the first error.
    pub fn try_for_each_tokenized_document<F>(&self, f: F) -> Result<usize>
    where
        F: FnMut(usize, Vec<TokenId>) -> Result<()>,
    {
        try_for_each_record_limited(self.token_location()?, self.config.max_record_bytes, f)
    }

    /// Call `f(index, tokens)` for every token record in file order.
    pub fn for_each_tokenized_document<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(usize, Vec<TokenId>),
    {
        self.try_for_each_tokenized_document(|i, tokens| {
            f(i, tokens);
            Ok(())
        })
    }

    /// Collect `f(index, tokens)` over every token record.
    pub fn map_tokenized_documents<U, F>(&self, mut f: F) -> Result<Vec<U>>
    where
        F: FnMut(usize, Vec<TokenId>) -> U,
    {
        let mut out = Vec::new();
        self.for_each_tokenized_document(|i, tokens| out.push(f(i, tokens)))?;
        Ok(out)
    }

    // ========================================================================
    // Vocabulary and tokenization
    // ========================================================================

    /// Build a vocabulary from the text file and bind it.
    pub fn build_vocabulary(&mut self, options: &VocabularyOptions) -> Result<&Vocabulary> {
        let text = self
            .text_stream
            .location()
            .map_err(|_| Error::MissingTextLocation)?;
        let vocabulary = Vocabulary::build_from_file(text, options)?;
        Ok(self.vocabulary.insert(vocabulary))
    }

    /// Tokenize one string against the bound vocabulary.
    pub fn tokenize_string(&self, text: &str) -> Result<Vec<TokenId>> {
        let vocabulary = self.vocabulary.as_ref().ok_or(Error::NoVocabulary)?;
        Ok(vocabulary.tokenize(text))
    }

    /// Tokenize the text file into the token file.
    ///
    /// The token stream is released first and reopens on the next read.
    /// Returns the number of records written.
    pub fn tokenize(&mut self) -> Result<usize> {
        let text = self
            .text_stream
            .location()
            .map_err(|_| Error::MissingTextLocation)?
            .to_path_buf();
        let vocabulary = self.vocabulary.as_ref().ok_or(Error::NoVocabulary)?;
        let token = self.token_stream.location()?.to_path_buf();

        self.token_stream.release();
        tokenize_to_file(vocabulary, &text, &token)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Persistable projection of this corpus.
    pub fn snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot {
            text_location: self.text_location().ok().map(Path::to_path_buf),
            token_location: self.token_location().ok().map(Path::to_path_buf),
            vocabulary: self.vocabulary.clone(),
            document_count: self.document_count,
        }
    }

    /// Rebuild a corpus from a snapshot. No handles are opened.
    pub fn from_snapshot(snapshot: CorpusSnapshot, config: CorpusConfig) -> Result<Self> {
        config.validate()?;
        if snapshot.text_location.is_some() != snapshot.token_location.is_some() {
            return Err(Error::Config(
                "text and token locations must be set together".to_string(),
            ));
        }
        let mut corpus = Self::from_parts(snapshot.text_location, snapshot.token_location, config);
        corpus.vocabulary = snapshot.vocabulary;
        corpus.document_count = snapshot.document_count;
        Ok(corpus)
    }

    /// Save the snapshot to `destination`.
    pub fn save(&self, destination: impl AsRef<Path>) -> Result<()> {
        save_snapshot(destination, &self.snapshot(), self.config.sync_on_save)
    }

    /// Load a corpus saved with [`Corpus::save`].
    pub fn load(source: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_config(source, CorpusConfig::default())
    }

    /// Load a corpus with explicit configuration.
    pub fn load_with_config(source: impl AsRef<Path>, config: CorpusConfig) -> Result<Self> {
        Self::from_snapshot(load_snapshot(source)?, config)
    }

    // ========================================================================
    // Indexed build
    // ========================================================================

    /// Run the single-pass indexed build with default configuration.
    pub fn build_indexed(
        input: impl AsRef<Path>,
        output_base: impl AsRef<Path>,
        options: &VocabularyOptions,
    ) -> Result<BuiltCorpus> {
        Self::build_indexed_with_config(input, output_base, options, CorpusConfig::default())
    }

    /// Run the single-pass indexed build.
    ///
    /// The returned corpus reads text from `input` and tokens from the
    /// `.tok` artifact, with the vocabulary bound and the document count set.
    pub fn build_indexed_with_config(
        input: impl AsRef<Path>,
        output_base: impl AsRef<Path>,
        options: &VocabularyOptions,
        config: CorpusConfig,
    ) -> Result<BuiltCorpus> {
        config.validate()?;
        let input = input.as_ref();
        let artifacts = config.artifacts_for(output_base.as_ref());
        let output = build_indexed(input, &artifacts, options)?;

        let mut corpus = Self::with_locations(input, artifacts.tokens.clone(), config)?;
        corpus.document_count = output.index.len() as u64;
        corpus.vocabulary = Some(output.vocabulary);

        info!(
            input = %input.display(),
            documents = corpus.document_count,
            "Built indexed corpus"
        );
        Ok(BuiltCorpus {
            corpus,
            artifacts,
            index: output.index,
        })
    }
}

/// Result of [`Corpus::build_indexed`]
#[derive(Debug)]
pub struct BuiltCorpus {
    /// Corpus bound to the input text and the token artifact
    pub corpus: Corpus,
    /// Paths of the three artifacts
    pub artifacts: BuildArtifacts,
    /// Offset index written with them
    pub index: OffsetIndex,
}

impl BuiltCorpus {
    /// Random-access reader over the artifacts, reusing the in-memory index.
    pub fn reader(&self) -> IndexedReader {
        IndexedReader::with_index(&self.artifacts, self.index.clone())
            .with_max_record_bytes(self.corpus.config.max_record_bytes)
    }
}
