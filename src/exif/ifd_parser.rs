//! IFD parser
//!
//! Parses one directory: the entry count, the entry table and the trailing
//! next-IFD offset. A table that is cut short by the end of the stream
//! keeps the entries read so far.
//!
//! One parser serves a whole read. It parses each nested directory offset
//! once and decodes at most twice the entries and out-of-line value bytes
//! the window can hold.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::SeekFrom;

use log::{debug, warn};

use crate::exif::constants::layout;
use crate::exif::directory::{Directory, DirectoryView};
use crate::exif::entry::Entry;
use crate::exif::entry_reader::{self, RawEntry};
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::sub_directory;
use crate::exif::tag_names::TagNames;
use crate::exif::types::IfdKind;
use crate::exif::value::{Value, ValueError};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;

/// A parsed directory and where its sibling starts
#[derive(Debug)]
pub struct ParsedIfd {
    pub directory: Directory,
    /// Offset of the next directory in the chain, `None` at the end
    pub next_offset: Option<u64>,
}

/// Parser state shared by every directory of one read
pub struct IfdParser<'a> {
    handler: &'a dyn ByteOrderHandler,
    names: &'a TagNames,
    stream_length: u64,
    resolve_sub_directories: bool,
    /// Offsets of nested directories already parsed
    nested_offsets: RefCell<HashSet<u64>>,
    /// Entries that may still be decoded
    entry_budget: Cell<u64>,
    /// Out-of-line value bytes that may still be read
    value_budget: Cell<u64>,
}

impl<'a> IfdParser<'a> {
    pub fn new(
        handler: &'a dyn ByteOrderHandler,
        names: &'a TagNames,
        stream_length: u64,
        resolve_sub_directories: bool,
    ) -> Self {
        IfdParser {
            handler,
            names,
            stream_length,
            resolve_sub_directories,
            nested_offsets: RefCell::new(HashSet::new()),
            entry_budget: Cell::new((stream_length / layout::ENTRY_SIZE).saturating_mul(2)),
            value_budget: Cell::new(stream_length.saturating_mul(2)),
        }
    }

    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.handler
    }

    pub fn stream_length(&self) -> u64 {
        self.stream_length
    }

    /// Records a nested directory offset; false if it was already parsed
    pub fn claim_nested_offset(&self, offset: u64) -> bool {
        self.nested_offsets.borrow_mut().insert(offset)
    }

    fn take_entry(&self) -> bool {
        let remaining = self.entry_budget.get();
        if remaining == 0 {
            return false;
        }
        self.entry_budget.set(remaining - 1);
        true
    }

    fn take_value_bytes(&self, bytes: u64) -> bool {
        let remaining = self.value_budget.get();
        if bytes > remaining {
            return false;
        }
        self.value_budget.set(remaining - bytes);
        true
    }

    /// Parses the directory at `offset`
    ///
    /// Fails only when the entry count itself cannot be read.
    pub fn parse(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        kind: IfdKind,
    ) -> ExifResult<ParsedIfd> {
        if offset.saturating_add(layout::ENTRY_COUNT_SIZE) > self.stream_length {
            return Err(ExifError::InvalidOffset {
                offset,
                length: self.stream_length,
            });
        }

        reader.seek(SeekFrom::Start(offset))?;
        let entry_count = self.handler.read_u16(reader)? as u64;
        debug!("{} IFD at offset {}: {} entries declared", kind, offset, entry_count);

        let mut directory = Directory::new(kind, offset);
        let table_start = offset + layout::ENTRY_COUNT_SIZE;
        let mut complete = true;

        for index in 0..entry_count {
            let position = table_start + index * layout::ENTRY_SIZE;

            if position + layout::ENTRY_SIZE > self.stream_length {
                warn!("{} IFD at offset {} declares {} entries, only {} fit before end of data",
                      kind, offset, entry_count, index);
                complete = false;
                break;
            }

            if !self.take_entry() {
                warn!("Entry limit for this window reached in {} IFD at offset {}, {} of {} entries read",
                      kind, offset, index, entry_count);
                complete = false;
                break;
            }

            let raw = match RawEntry::read(reader, position, self.handler) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Failed to read entry {} of {} IFD at offset {}: {}",
                          index, kind, offset, e);
                    complete = false;
                    break;
                }
            };

            directory.add_entry(self.decode_entry(reader, &raw, kind));
        }

        let next_offset = if complete {
            self.read_next_offset(reader, table_start + entry_count * layout::ENTRY_SIZE)
        } else {
            None
        };

        debug!("{} IFD at offset {}: {} entries read, next IFD: {:?}",
               kind, offset, directory.size(), next_offset);

        Ok(ParsedIfd {
            directory,
            next_offset,
        })
    }

    fn decode_entry(&self, reader: &mut dyn SeekableReader, raw: &RawEntry, kind: IfdKind) -> Entry {
        let field_type = raw.field_type();
        let mut value = if raw.is_inline() || self.take_value_bytes(self.readable_bytes(raw)) {
            entry_reader::resolve_value(reader, raw, self.handler, self.stream_length)
        } else {
            warn!("Value byte limit for this window reached, skipping tag {} value", raw.tag);
            Value::Error(ValueError::new(
                std::io::ErrorKind::InvalidData,
                format!("value of tag {} exceeds the bytes left to read in this window", raw.tag),
            ))
        };

        if self.resolve_sub_directories {
            if let Some(nested_kind) = sub_directory::nested_kind(kind, raw.tag) {
                value = sub_directory::resolve(self, reader, raw.tag, value, nested_kind);
            }
        }

        let field_name = self.names.name(kind, raw.tag).map(str::to_string);
        debug!("Entry: tag={} ({}), type={}, count={}",
               raw.tag, field_name.as_deref().unwrap_or("Unknown"), raw.type_code, raw.count);

        Entry::new(raw.tag, field_name, field_type, raw.count, value)
    }

    /// Bytes of an out-of-line value that lie inside the window
    fn readable_bytes(&self, raw: &RawEntry) -> u64 {
        let available = self.stream_length.saturating_sub(raw.value_offset(self.handler));
        raw.byte_length().min(available)
    }

    /// Reads the next-IFD field; zero and unreadable both end the chain
    fn read_next_offset(&self, reader: &mut dyn SeekableReader, position: u64) -> Option<u64> {
        if position + layout::NEXT_IFD_OFFSET_SIZE > self.stream_length {
            debug!("No next IFD offset at {}: end of data", position);
            return None;
        }

        let next = reader
            .seek(SeekFrom::Start(position))
            .and_then(|_| self.handler.read_u32(reader));

        match next {
            Ok(0) => None,
            Ok(offset) => Some(offset as u64),
            Err(e) => {
                warn!("Failed to read next IFD offset at {}: {}", position, e);
                None
            }
        }
    }
}
