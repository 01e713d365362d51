//! Framed record encoding
//!
//! Every serialized artifact (token files, document files, offset indexes,
//! saved corpus metadata) is a sequence of framed records.
//!
//! ## Record Format
//!
//! ```text
//! [length: u32][crc32: u32][payload: bytes]
//! ```
//!
//! - **length**: payload size in bytes (little-endian)
//! - **crc32**: CRC32 checksum over the payload (little-endian)
//! - **payload**: bincode-serialized value
//!
//! A clean end of file before a length prefix ends the sequence. Anything
//! else that does not parse is a `CorruptRecord`.

use corpora_core::{Error, Result};
use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Size of the `[length][crc32]` frame header
pub const RECORD_HEADER_SIZE: usize = 8;

/// Default upper bound on a single record payload (64MB)
pub const DEFAULT_MAX_RECORD_BYTES: u32 = 64 * 1024 * 1024;

/// Encode a value as one framed record.
pub fn encode_record<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let payload = bincode::serialize(value)?;
    let len = u32::try_from(payload.len())
        .map_err(|_| Error::Serialization(format!("record too large: {} bytes", payload.len())))?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + payload.len());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Read up to `buf.len()` bytes, stopping early only at end of file.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read and decode one framed record starting at `offset`.
///
/// Returns `Ok(None)` at a clean end of file, otherwise the value and the
/// number of bytes consumed.
pub fn read_record<T, R>(reader: &mut R, offset: u64, max_len: u32) -> Result<Option<(T, u64)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut header = [0u8; RECORD_HEADER_SIZE];
    let got = read_full(reader, &mut header)?;
    if got == 0 {
        return Ok(None);
    }
    if got < RECORD_HEADER_SIZE {
        return Err(Error::corrupt(offset, "truncated record header"));
    }

    let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let stored_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if len > max_len {
        return Err(Error::corrupt(
            offset,
            format!("record length {} exceeds limit {}", len, max_len),
        ));
    }

    let mut payload = vec![0u8; len as usize];
    if read_full(reader, &mut payload)? < payload.len() {
        return Err(Error::corrupt(offset, "truncated record payload"));
    }

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let computed = hasher.finalize();
    if computed != stored_crc {
        return Err(Error::corrupt(
            offset,
            format!("CRC mismatch: stored {:08x}, computed {:08x}", stored_crc, computed),
        ));
    }

    let value = bincode::deserialize(&payload).map_err(|e| Error::corrupt(offset, e.to_string()))?;
    Ok(Some((value, (RECORD_HEADER_SIZE + payload.len()) as u64)))
}

/// Sequential writer of framed records that tracks its byte position.
///
/// The position after each append is what the offset index records.
pub struct RecordWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    position: u64,
}

impl RecordWriter {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::write(&path, e))?;
        Ok(RecordWriter {
            path,
            writer: BufWriter::new(file),
            position: 0,
        })
    }

    /// Path being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current byte position (bytes written so far)
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Append one record and return the position after it.
    pub fn append<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<u64> {
        let bytes = encode_record(value)?;
        self.writer
            .write_all(&bytes)
            .map_err(|e| Error::write(&self.path, e))?;
        self.position += bytes.len() as u64;
        Ok(self.position)
    }

    /// Flush buffered bytes to the OS without syncing.
    pub fn flush(mut self) -> Result<u64> {
        self.writer
            .flush()
            .map_err(|e| Error::write(&self.path, e))?;
        Ok(self.position)
    }

    /// Flush buffered bytes and fsync the file.
    pub fn finish(mut self) -> Result<u64> {
        self.writer
            .flush()
            .map_err(|e| Error::write(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| Error::write(&self.path, e))?;
        Ok(self.position)
    }
}

/// Sequential reader of framed records over any byte source.
pub struct RecordReader<R> {
    reader: R,
    offset: u64,
    max_len: u32,
}

impl<R: Read> RecordReader<R> {
    /// Wrap a reader positioned at a record boundary
    pub fn new(reader: R) -> Self {
        RecordReader {
            reader,
            offset: 0,
            max_len: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    /// Override the per-record size limit
    pub fn with_max_record_bytes(mut self, max_len: u32) -> Self {
        self.max_len = max_len;
        self
    }

    /// Byte offset of the next record
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next record, or `None` at end of input.
    pub fn next_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match read_record(&mut self.reader, self.offset, self.max_len)? {
            Some((value, consumed)) => {
                self.offset += consumed;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

fn open_records(path: &Path) -> Result<RecordReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    Ok(RecordReader::new(BufReader::new(file)))
}

/// Call `f(index, record)` for every record in the file, stopping at the
/// first error. Returns the number of records visited.
pub fn try_for_each_record<T, F>(path: impl AsRef<Path>, f: F) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(usize, T) -> Result<()>,
{
    try_for_each_record_limited(path, DEFAULT_MAX_RECORD_BYTES, f)
}

/// Like [`try_for_each_record`] with an explicit per-record size limit.
pub fn try_for_each_record_limited<T, F>(
    path: impl AsRef<Path>,
    max_len: u32,
    mut f: F,
) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(usize, T) -> Result<()>,
{
    let mut reader = open_records(path.as_ref())?.with_max_record_bytes(max_len);
    let mut index = 0;
    while let Some(record) = reader.next_record::<T>()? {
        f(index, record)?;
        index += 1;
    }
    Ok(index)
}

/// Call `f(index, record)` for every record in the file.
pub fn for_each_record<T, F>(path: impl AsRef<Path>, mut f: F) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(usize, T),
{
    try_for_each_record(path, |i, record| {
        f(i, record);
        Ok(())
    })
}

/// Collect `f(index, record)` over every record in the file, in file order.
pub fn map_records<T, U, F>(path: impl AsRef<Path>, mut f: F) -> Result<Vec<U>>
where
    T: DeserializeOwned,
    F: FnMut(usize, T) -> U,
{
    let mut out = Vec::new();
    for_each_record(path, |i, record| out.push(f(i, record)))?;
    Ok(out)
}

/// Write a single value as the only record of a file (truncating it).
pub fn write_value_to_file<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<u64> {
    let mut writer = RecordWriter::create(path)?;
    writer.append(value)?;
    writer.finish()
}

/// Read the first record of a file as a single value.
pub fn read_value_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let mut reader = open_records(path.as_ref())?;
    reader
        .next_record()?
        .ok_or_else(|| Error::corrupt(0, "file contains no record"))
}
