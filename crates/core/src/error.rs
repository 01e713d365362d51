//! Error types for corpora
//!
//! Every crate in the workspace reports failures through [`Error`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for corpora operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for corpus storage and streaming
#[derive(Debug, Error)]
pub enum Error {
    /// An operation needed a location that was never set
    #[error("No location bound for {what}")]
    UnboundLocation {
        /// Which location was requested (e.g. "text", "token")
        what: &'static str,
    },

    /// Vocabulary construction or tokenization needs a text location
    #[error("Corpus has no text location")]
    MissingTextLocation,

    /// Tokenization attempted before a vocabulary was bound
    #[error("No vocabulary bound to corpus")]
    NoVocabulary,

    /// Underlying file missing or unreadable on first access
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that could not be opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Sequential read past the last record
    #[error("End of stream")]
    EndOfStream,

    /// Record bytes do not decode to the expected shape
    #[error("Corrupt record at offset {offset}: {reason}")]
    CorruptRecord {
        /// Byte offset of the record start
        offset: u64,
        /// What was wrong with it
        reason: String,
    },

    /// Write failure while producing an artifact
    #[error("Failed to write {path}: {source}")]
    IoWrite {
        /// Artifact being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Other read-side I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration or options
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Wrap an I/O error raised while writing `path`
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error raised while opening `path`
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    /// Build a `CorruptRecord` error
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// True if this is the end-of-stream marker
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}
