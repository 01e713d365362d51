//! Storage layer for corpora
//!
//! This crate owns the byte-level formats and read paths:
//! - record: framed bincode records with CRC32 (token, document, index files)
//! - lines: line iteration over raw text files
//! - stream: lazy, resettable file-backed streams
//! - offsets: the offset index produced by the build pipeline

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lines;
pub mod offsets;
pub mod record;
pub mod stream;

pub use offsets::OffsetIndex;
pub use record::{RecordReader, RecordWriter, DEFAULT_MAX_RECORD_BYTES};
pub use stream::{
    DocumentStream, FramedFormat, LazyStream, LineFormat, RecordFormat, RecordStream, TokenStream,
};
