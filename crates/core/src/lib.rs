//! Core types for corpora
//!
//! This crate defines the foundational pieces shared by every other crate:
//! - Error: the error taxonomy and `Result` alias
//! - TokenId: integer index of a vocabulary word
//! - split: the whitespace word splitter used by vocabulary and tokenization

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod split;

pub use error::{Error, Result};
pub use split::split_words;

/// Index of a word within a vocabulary
pub type TokenId = u32;
