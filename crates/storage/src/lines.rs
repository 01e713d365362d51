//! Line iteration over raw text files
//!
//! Each line of a text file is one document. Line endings (`\n` or `\r\n`)
//! are stripped. A final line without a terminating newline still counts.
//! Bytes that are not valid UTF-8 decode to U+FFFD, so one bad byte never
//! drops a document or shifts the ones after it.

use corpora_core::split::trim_line_ending;
use corpora_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a text file for buffered line reading.
pub fn open_lines(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    Ok(BufReader::new(file))
}

/// Read one line (without its line ending), or `None` at end of file.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    trim_line_ending(&mut line);
    Ok(Some(match String::from_utf8(line) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }))
}

/// Call `f(index, line)` for every line, stopping at the first error.
/// Returns the number of lines visited.
pub fn try_for_each_line<F>(path: impl AsRef<Path>, mut f: F) -> Result<usize>
where
    F: FnMut(usize, String) -> Result<()>,
{
    let mut reader = open_lines(path)?;
    let mut index = 0;
    while let Some(line) = read_line(&mut reader)? {
        f(index, line)?;
        index += 1;
    }
    Ok(index)
}

/// Call `f(index, line)` for every line of the file.
pub fn for_each_line<F>(path: impl AsRef<Path>, mut f: F) -> Result<usize>
where
    F: FnMut(usize, String),
{
    try_for_each_line(path, |i, line| {
        f(i, line);
        Ok(())
    })
}

/// Collect `f(index, line)` over every line, in file order.
pub fn map_lines<U, F>(path: impl AsRef<Path>, mut f: F) -> Result<Vec<U>>
where
    F: FnMut(usize, String) -> U,
{
    let mut out = Vec::new();
    for_each_line(path, |i, line| out.push(f(i, line)))?;
    Ok(out)
}

/// Count the lines of a text file without decoding them.
pub fn count_lines(path: impl AsRef<Path>) -> Result<usize> {
    let mut reader = open_lines(path)?;
    let mut line = Vec::new();
    let mut count = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(count);
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_count_lines() {
        let dir = TempDir::new().unwrap();
        assert_eq!(count_lines(write(&dir, "a", "")).unwrap(), 0);
        assert_eq!(count_lines(write(&dir, "b", "one\n")).unwrap(), 1);
        assert_eq!(count_lines(write(&dir, "c", "one\ntwo")).unwrap(), 2);
        assert_eq!(count_lines(write(&dir, "d", "one\n\nthree\n")).unwrap(), 3);
    }

    #[test]
    fn test_map_lines_strips_endings() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "crlf", "alpha\r\nbeta\ngamma");
        let lines = map_lines(&path, |i, line| format!("{}:{}", i, line)).unwrap();
        assert_eq!(lines, vec!["0:alpha", "1:beta", "2:gamma"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = count_lines(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1");
        std::fs::write(&path, b"caf\xe9 ok\r\nsecond line\nthird").unwrap();

        assert_eq!(count_lines(&path).unwrap(), 3);
        let lines = map_lines(&path, |_, line| line).unwrap();
        assert_eq!(lines, vec!["caf\u{FFFD} ok", "second line", "third"]);
    }

    #[test]
    fn test_read_line_sequence() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "seq", "x\ny\n");
        let mut reader = open_lines(&path).unwrap();
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("x"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("y"));
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }
}
