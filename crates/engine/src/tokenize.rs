//! File-level tokenization
//!
//! The per-line transform is [`Vocabulary::tokenize`]: split on spaces, drop
//! unknown words, map the rest to indices in order.

use corpora_core::{Result, TokenId};
use corpora_storage::lines::{map_lines, try_for_each_line};
use corpora_storage::RecordWriter;
use corpora_vocab::Vocabulary;
use std::path::Path;
use tracing::info;

/// Tokenize every line of `path` and keep the results in memory.
///
/// Intended for small inputs.
pub fn tokenize_to_memory(vocabulary: &Vocabulary, path: impl AsRef<Path>) -> Result<Vec<Vec<TokenId>>> {
    map_lines(path, |_, line| vocabulary.tokenize(&line))
}

/// Tokenize every line of `input` into one framed record per line in
/// `output`, holding one record in memory at a time.
///
/// Returns the number of records written.
pub fn tokenize_to_file(
    vocabulary: &Vocabulary,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let mut writer = RecordWriter::create(output)?;
    let count = try_for_each_line(input, |_, line| {
        writer.append(&vocabulary.tokenize(&line))?;
        Ok(())
    })?;
    let bytes = writer.finish()?;

    info!(
        input = %input.display(),
        output = %output.display(),
        records = count,
        bytes,
        "Tokenized file"
    );
    Ok(count)
}
