//! corpora - streamed text corpora backed by plain files
//!
//! A corpus is a raw text file (one document per line), an optional
//! tokenized counterpart, and an optional vocabulary. Everything is read
//! lazily through file handles, so corpora larger than memory stay cheap.
//!
//! # Quick Start
//!
//! ```ignore
//! use corpora::{Corpus, VocabularyOptions};
//!
//! let mut corpus = Corpus::open("news.txt")?;
//! corpus.build_vocabulary(&VocabularyOptions::default().with_lo(2))?;
//! corpus.tokenize()?;
//!
//! while let Ok(tokens) = corpus.next_tokenized_document() {
//!     println!("{tokens:?}");
//! }
//! corpus.save("news.corpus")?;
//! ```
//!
//! # Architecture
//!
//! - `corpora-core`: errors and shared types
//! - `corpora-storage`: record framing, line reading, lazy streams, offset index
//! - `corpora-vocab`: vocabulary building and tokenization
//! - `corpora-durability`: indexed build artifacts and snapshots
//! - `corpora-engine`: the [`Corpus`] aggregate

pub use corpora_core::{Error, Result, TokenId};
pub use corpora_durability::{BuildArtifacts, CorpusSnapshot};
pub use corpora_engine::*;
pub use corpora_storage::OffsetIndex;
pub use corpora_vocab::{Vocabulary, VocabularyOptions};
