//! Bounded window over a seekable source
//!
//! Container readers locate the metadata byte range (an APP1 segment, a
//! whole TIFF file) and hand it over as a `BoundedStream`. Positions inside
//! the window start at zero, so TIFF offsets can be used as-is.

use log::debug;
use std::io::{self, Read, Seek, SeekFrom};

/// A fixed window `[start, start + length)` of an underlying reader
///
/// Seeking past the end of the window is allowed; reads there return zero
/// bytes, which surfaces as `UnexpectedEof` from `read_exact`.
#[derive(Debug)]
pub struct BoundedStream<R> {
    inner: R,
    start: u64,
    length: u64,
    position: u64,
}

impl<R: Read + Seek> BoundedStream<R> {
    /// Creates a window of at most `length` bytes starting at `start`
    ///
    /// The window is clamped to the data actually available in `inner`.
    pub fn new(mut inner: R, start: u64, length: u64) -> io::Result<Self> {
        let inner_length = inner.seek(SeekFrom::End(0))?;
        let available = inner_length.saturating_sub(start);
        let length = length.min(available);
        inner.seek(SeekFrom::Start(start))?;

        debug!("Bounded stream: start={}, length={} (source length {})",
               start, length, inner_length);

        Ok(BoundedStream {
            inner,
            start,
            length,
            position: 0,
        })
    }

    /// Creates a window from `start` to the end of `inner`
    pub fn from_offset(inner: R, start: u64) -> io::Result<Self> {
        Self::new(inner, start, u64::MAX)
    }

    /// Length of the window in bytes
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Whether the window holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Absolute offset of the window in the underlying reader
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for BoundedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.length || buf.is_empty() {
            return Ok(0);
        }

        let remaining = self.length - self.position;
        let wanted = (buf.len() as u64).min(remaining) as usize;

        self.inner.seek(SeekFrom::Start(self.start + self.position))?;
        let read = self.inner.read(&mut buf[..wanted])?;
        self.position += read as u64;

        Ok(read)
    }
}

impl<R: Read + Seek> Seek for BoundedStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.length.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            )),
        }
    }
}
