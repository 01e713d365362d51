//! Durability layer for corpora
//!
//! This crate handles everything that writes corpus state to disk:
//!
//! - Indexed build: one pass from a raw text file to document, token and
//!   offset-index artifacts
//! - Artifact paths derived from an output base
//! - Corpus metadata snapshots with crash-safe save

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod build;
pub mod paths;
pub mod snapshot;

pub use build::{build_indexed, write_indexed, BuildOutput, IndexedWriter};
pub use paths::{append_extension, BuildArtifacts};
pub use snapshot::{load_snapshot, save_snapshot, CorpusSnapshot};
