//! Lazy, resettable file-backed streams
//!
//! A [`LazyStream`] pairs an optional location with an optional open read
//! handle. Nothing is opened until the first read; the handle is then cached
//! and reused until it is released. Dropping the stream releases the handle.
//!
//! [`RecordStream`] layers a record format on top: raw text lines for the
//! document stream, framed token records for the token stream.

use crate::lines::read_line;
use crate::record::{read_record, DEFAULT_MAX_RECORD_BYTES};
use corpora_core::{Error, Result, TokenId};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed byte source opened on first use.
#[derive(Debug)]
pub struct LazyStream {
    /// Label used in `UnboundLocation` errors and logs
    what: &'static str,
    location: Option<PathBuf>,
    reader: Option<BufReader<File>>,
}

impl LazyStream {
    /// Create a stream, optionally bound to a location. Nothing is opened.
    pub fn new(what: &'static str, location: Option<PathBuf>) -> Self {
        LazyStream {
            what,
            location,
            reader: None,
        }
    }

    /// Create a stream with no location
    pub fn unbound(what: &'static str) -> Self {
        Self::new(what, None)
    }

    /// The bound location
    pub fn location(&self) -> Result<&Path> {
        self.location
            .as_deref()
            .ok_or(Error::UnboundLocation { what: self.what })
    }

    /// True if a location was set
    pub fn is_bound(&self) -> bool {
        self.location.is_some()
    }

    /// True if the handle is currently open
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// The open read handle, opening it at `location()` on first call.
    pub fn handle(&mut self) -> Result<&mut BufReader<File>> {
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => {
                let path = self.location()?;
                let file = File::open(path).map_err(|e| Error::open(path, e))?;
                debug!(stream = self.what, path = %path.display(), "Opened stream");
                BufReader::new(file)
            }
        };
        Ok(self.reader.insert(reader))
    }

    /// Current read position; 0 if never opened.
    pub fn position(&mut self) -> Result<u64> {
        match self.reader.as_mut() {
            Some(reader) => Ok(reader.stream_position()?),
            None => Ok(0),
        }
    }

    /// Move the read position to `offset`, opening the handle if needed.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.handle()?.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Seek an open handle back to offset 0. No-op if never opened.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(reader) = self.reader.as_mut() {
            reader.seek(SeekFrom::Start(0))?;
            debug!(stream = self.what, "Reset stream");
        }
        Ok(())
    }

    /// Close the handle if open and forget it. Safe to call repeatedly.
    pub fn release(&mut self) {
        if self.reader.take().is_some() {
            debug!(stream = self.what, "Released stream");
        }
    }
}

impl Drop for LazyStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// How records are laid out in a stream's file.
pub trait RecordFormat {
    /// Decoded record type
    type Item;

    /// Read the record at the reader's position, or `None` at end of file.
    fn read_next(reader: &mut BufReader<File>, offset: u64, max_len: u32)
        -> Result<Option<Self::Item>>;
}

/// One raw text line per record
pub struct LineFormat;

impl RecordFormat for LineFormat {
    type Item = String;

    fn read_next(reader: &mut BufReader<File>, _offset: u64, _max_len: u32) -> Result<Option<String>> {
        read_line(reader)
    }
}

/// One framed bincode record per item
pub struct FramedFormat<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned> RecordFormat for FramedFormat<T> {
    type Item = T;

    fn read_next(reader: &mut BufReader<File>, offset: u64, max_len: u32) -> Result<Option<T>> {
        Ok(read_record(reader, offset, max_len)?.map(|(value, _)| value))
    }
}

/// A [`LazyStream`] that yields typed records.
pub struct RecordStream<F> {
    stream: LazyStream,
    max_record_bytes: u32,
    _format: PhantomData<fn() -> F>,
}

/// Raw documents, one per text line
pub type DocumentStream = RecordStream<LineFormat>;

/// Token-index sequences, one framed record per document
pub type TokenStream = RecordStream<FramedFormat<Vec<TokenId>>>;

impl<F: RecordFormat> RecordStream<F> {
    /// Create a stream over `location`. Nothing is opened.
    pub fn new(what: &'static str, location: Option<PathBuf>) -> Self {
        RecordStream {
            stream: LazyStream::new(what, location),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            _format: PhantomData,
        }
    }

    /// Override the per-record size limit for framed formats
    pub fn with_max_record_bytes(mut self, max_record_bytes: u32) -> Self {
        self.max_record_bytes = max_record_bytes;
        self
    }

    /// Read the next record from the current position.
    ///
    /// Fails with `EndOfStream` once the file is exhausted.
    pub fn next_record(&mut self) -> Result<F::Item> {
        let max_len = self.max_record_bytes;
        let reader = self.stream.handle()?;
        let offset = reader.stream_position()?;
        F::read_next(reader, offset, max_len)?.ok_or(Error::EndOfStream)
    }

    /// Read the record that starts at byte `offset`.
    pub fn record_at(&mut self, offset: u64) -> Result<F::Item> {
        self.stream.seek(offset)?;
        self.next_record()
    }

    /// The bound location
    pub fn location(&self) -> Result<&Path> {
        self.stream.location()
    }

    /// True if a location was set
    pub fn is_bound(&self) -> bool {
        self.stream.is_bound()
    }

    /// True if the handle is currently open
    pub fn is_open(&self) -> bool {
        self.stream.is_open()
    }

    /// Open the handle now if it is not open yet
    pub fn open(&mut self) -> Result<()> {
        self.stream.handle().map(|_| ())
    }

    /// Current read position; 0 if never opened
    pub fn position(&mut self) -> Result<u64> {
        self.stream.position()
    }

    /// Seek back to offset 0 if open
    pub fn reset(&mut self) -> Result<()> {
        self.stream.reset()
    }

    /// Close the handle
    pub fn release(&mut self) {
        self.stream.release()
    }
}

impl<F> fmt::Debug for RecordStream<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStream")
            .field("stream", &self.stream)
            .field("max_record_bytes", &self.max_record_bytes)
            .finish()
    }
}
