//! Corpus engine
//!
//! Ties storage, vocabulary and durability together into the [`Corpus`]
//! aggregate:
//! - lazy streaming over raw text and token files
//! - vocabulary building and tokenization
//! - the single-pass indexed build and random access into its output
//! - snapshot save and load

#![warn(missing_docs)]

pub mod config;
pub mod corpus;
pub mod reader;
pub mod tokenize;

pub use config::CorpusConfig;
pub use corpus::{BuiltCorpus, Corpus};
pub use reader::IndexedReader;
pub use tokenize::{tokenize_to_file, tokenize_to_memory};
