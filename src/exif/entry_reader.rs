//! Entry decoder
//!
//! Reads one 12-byte entry record and resolves its value, either from the
//! record itself or from the offset the record points at. Resolution never
//! fails: a value that cannot be read becomes an error marker, so the entry
//! survives with its declared tag, type and count.

use std::io::{Cursor, SeekFrom};

use log::{trace, warn};

use crate::exif::constants::layout;
use crate::exif::decoder;
use crate::exif::types::FieldType;
use crate::exif::value::{Value, ValueError};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;

/// An entry record before value resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry {
    pub tag: u16,
    pub type_code: u16,
    pub count: u32,
    /// The value-or-offset field, still in stream byte order
    pub value_field: [u8; 4],
}

impl RawEntry {
    /// Reads the record at `position`
    pub fn read(
        reader: &mut dyn SeekableReader,
        position: u64,
        handler: &dyn ByteOrderHandler,
    ) -> std::io::Result<Self> {
        reader.seek(SeekFrom::Start(position))?;

        let tag = handler.read_u16(reader)?;
        let type_code = handler.read_u16(reader)?;
        let count = handler.read_u32(reader)?;
        let mut value_field = [0u8; 4];
        reader.read_exact(&mut value_field)?;

        Ok(RawEntry {
            tag,
            type_code,
            count,
            value_field,
        })
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::from_code(self.type_code)
    }

    /// Declared size of the value in bytes
    pub fn byte_length(&self) -> u64 {
        self.count as u64 * self.field_type().element_size()
    }

    /// Whether the value lives inside the record
    pub fn is_inline(&self) -> bool {
        self.byte_length() <= layout::INLINE_VALUE_SIZE
    }

    /// The value-or-offset field read as an offset
    pub fn value_offset(&self, handler: &dyn ByteOrderHandler) -> u64 {
        let mut cursor = Cursor::new(&self.value_field[..]);
        // Four bytes are always there to read.
        handler.read_u32(&mut cursor).map(u64::from).unwrap_or_default()
    }
}

/// Resolves the value of `raw` against a stream of `stream_length` bytes
pub fn resolve_value(
    reader: &mut dyn SeekableReader,
    raw: &RawEntry,
    handler: &dyn ByteOrderHandler,
    stream_length: u64,
) -> Value {
    let field_type = raw.field_type();
    let byte_length = raw.byte_length();

    if raw.is_inline() {
        let bytes = &raw.value_field[..byte_length as usize];
        return decode_or_mark(field_type, bytes, handler);
    }

    let offset = raw.value_offset(handler);
    let available = stream_length.saturating_sub(offset);
    let element_size = field_type.element_size();
    let readable = byte_length.min(available) / element_size * element_size;

    trace!("Tag {} value: {} bytes at offset {}, {} readable",
           raw.tag, byte_length, offset, readable);

    if readable == 0 {
        warn!("Tag {} value at offset {} lies beyond end of data (length {})",
              raw.tag, offset, stream_length);
        return Value::Error(ValueError::eof(offset, byte_length));
    }

    if readable < byte_length {
        warn!("Tag {} value truncated: {} of {} bytes available at offset {}",
              raw.tag, readable, byte_length, offset);
    }

    let mut bytes = vec![0u8; readable as usize];
    let read = reader
        .seek(SeekFrom::Start(offset))
        .and_then(|_| reader.read_exact(&mut bytes));

    match read {
        Ok(()) => decode_or_mark(field_type, &bytes, handler),
        Err(e) => {
            warn!("Failed to read tag {} value at offset {}: {}", raw.tag, offset, e);
            Value::Error(ValueError::from(&e))
        }
    }
}

fn decode_or_mark(field_type: FieldType, bytes: &[u8], handler: &dyn ByteOrderHandler) -> Value {
    decoder::decode_value(field_type, bytes, handler)
        .unwrap_or_else(|e| Value::Error(ValueError::from(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::constants::field_types;
    use crate::io::byte_order::{BigEndianHandler, LittleEndianHandler};

    fn raw(type_code: u16, count: u32, value_field: [u8; 4]) -> RawEntry {
        RawEntry { tag: 0x1234, type_code, count, value_field }
    }

    #[test]
    fn test_read_record_big_endian() {
        let bytes = vec![0x01, 0x0e, 0x00, 0x02, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x20];
        let mut cursor = Cursor::new(bytes);
        let raw = RawEntry::read(&mut cursor, 0, &BigEndianHandler).unwrap();

        assert_eq!(raw.tag, 270);
        assert_eq!(raw.field_type(), FieldType::Ascii);
        assert_eq!(raw.count, 5);
        assert!(!raw.is_inline());
        assert_eq!(raw.value_offset(&BigEndianHandler), 32);
    }

    #[test]
    fn test_inline_value() {
        let mut cursor = Cursor::new(Vec::new());
        let entry = raw(field_types::SHORT, 2, [1, 0, 2, 0]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, 0);
        assert_eq!(value, Value::List(vec![Value::Short(1), Value::Short(2)]));
    }

    #[test]
    fn test_zero_count_ascii_is_empty_string() {
        let mut cursor = Cursor::new(Vec::new());
        let entry = raw(field_types::ASCII, 0, [0xde, 0xad, 0xbe, 0xef]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, 0);
        assert_eq!(value, Value::Ascii(String::new()));
    }

    #[test]
    fn test_offset_value_is_read_from_stream() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(b"Hello\0");
        let length = data.len() as u64;
        let mut cursor = Cursor::new(data);

        let entry = raw(field_types::ASCII, 6, [16, 0, 0, 0]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, length);
        assert_eq!(value, Value::Ascii("Hello".to_string()));
    }

    #[test]
    fn test_offset_beyond_stream_is_error_marker() {
        let mut cursor = Cursor::new(vec![0u8; 32]);
        let entry = raw(field_types::RATIONAL, 1, [0, 1, 0, 0]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, 32);

        assert!(value.is_error());
        assert!(value.as_error().unwrap().is_eof());
    }

    #[test]
    fn test_partially_available_value_keeps_whole_elements() {
        let mut data = vec![0u8; 8];
        data.extend_from_slice(&[1, 0, 0, 0, 2, 0, 0, 0, 3, 0]);
        let length = data.len() as u64;
        let mut cursor = Cursor::new(data);

        let entry = raw(field_types::LONG, 4, [8, 0, 0, 0]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, length);
        assert_eq!(value, Value::List(vec![Value::Long(1), Value::Long(2)]));
    }

    #[test]
    fn test_unknown_type_reads_raw_bytes() {
        let mut cursor = Cursor::new(Vec::new());
        let entry = raw(99, 3, [7, 8, 9, 0]);
        let value = resolve_value(&mut cursor, &entry, &LittleEndianHandler, 0);
        assert_eq!(entry.field_type(), FieldType::Undefined);
        assert_eq!(value, Value::Undefined(vec![7, 8, 9]));
    }
}
