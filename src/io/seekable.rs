//! Seekable reader trait
//!
//! Every parse in this crate reads through a `SeekableReader`: strictly one
//! caller, random access by absolute offset, reads that signal end of data.

use std::io::{Read, Seek};

/// Trait for byte sources that support absolute seeks
///
/// Offsets passed to `seek` are relative to the start of the metadata
/// window, which is also where TIFF offsets are anchored.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
