//! In-memory TIFF fixtures
//!
//! `TiffBuilder` lays out a header and directories the way writers do:
//! each directory is followed by the out-of-line data of its entries.
//! Offsets of nested directories are not known up front, so pointers are
//! written as placeholders and patched afterwards.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::exif::constants::field_types;
use crate::io::byte_order::ByteOrder;

/// Content of a test entry
#[derive(Debug, Clone)]
enum Content {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    Bytes(Vec<u8>),
    /// Value field written verbatim
    Raw(u32),
}

/// One entry to write
#[derive(Debug, Clone)]
pub struct Field {
    tag: u16,
    type_code: u16,
    count: u32,
    content: Content,
}

impl Field {
    pub fn short(tag: u16, value: u16) -> Self {
        Field { tag, type_code: field_types::SHORT, count: 1, content: Content::Shorts(vec![value]) }
    }

    pub fn shorts(tag: u16, values: &[u16]) -> Self {
        Field {
            tag,
            type_code: field_types::SHORT,
            count: values.len() as u32,
            content: Content::Shorts(values.to_vec()),
        }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Field { tag, type_code: field_types::LONG, count: 1, content: Content::Longs(vec![value]) }
    }

    pub fn rational(tag: u16, numerator: u32, denominator: u32) -> Self {
        Field {
            tag,
            type_code: field_types::RATIONAL,
            count: 1,
            content: Content::Rationals(vec![(numerator, denominator)]),
        }
    }

    /// NUL terminated ASCII
    pub fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Field { tag, type_code: field_types::ASCII, count: bytes.len() as u32, content: Content::Bytes(bytes) }
    }

    pub fn undefined(tag: u16, bytes: &[u8]) -> Self {
        Field {
            tag,
            type_code: field_types::UNDEFINED,
            count: bytes.len() as u32,
            content: Content::Bytes(bytes.to_vec()),
        }
    }

    /// An entry with arbitrary type, count and value field
    pub fn raw(tag: u16, type_code: u16, count: u32, value_field: u32) -> Self {
        Field { tag, type_code, count, content: Content::Raw(value_field) }
    }

    /// A LONG pointer to be patched once the target is written
    pub fn pointer(tag: u16) -> Self {
        Field::raw(tag, field_types::LONG, 1, 0)
    }
}

/// Position of a written directory
#[derive(Debug, Clone, Copy)]
pub struct IfdRef {
    pub offset: u32,
    pub count: u32,
}

impl IfdRef {
    /// Offset of the record of entry `index`
    pub fn entry_offset(&self, index: u32) -> u32 {
        self.offset + 2 + 12 * index
    }

    /// Offset of the next-IFD field
    pub fn next_field_offset(&self) -> u32 {
        self.entry_offset(self.count)
    }
}

pub struct TiffBuilder {
    order: ByteOrder,
    buf: Vec<u8>,
}

impl TiffBuilder {
    /// Header with the first IFD at offset 8
    pub fn new(order: ByteOrder) -> Self {
        let mut builder = TiffBuilder { order, buf: Vec::new() };
        match order {
            ByteOrder::LittleEndian => builder.buf.extend_from_slice(b"II"),
            ByteOrder::BigEndian => builder.buf.extend_from_slice(b"MM"),
        }
        builder.put_u16(42);
        builder.put_u32(8);
        builder
    }

    pub fn len(&self) -> u32 {
        self.buf.len() as u32
    }

    pub fn put_u16(&mut self, value: u16) {
        match self.order {
            ByteOrder::LittleEndian => self.buf.write_u16::<LittleEndian>(value).unwrap(),
            ByteOrder::BigEndian => self.buf.write_u16::<BigEndian>(value).unwrap(),
        }
    }

    pub fn put_u32(&mut self, value: u32) {
        match self.order {
            ByteOrder::LittleEndian => self.buf.write_u32::<LittleEndian>(value).unwrap(),
            ByteOrder::BigEndian => self.buf.write_u32::<BigEndian>(value).unwrap(),
        }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a directory with its data at the end of the buffer
    pub fn write_ifd(&mut self, fields: &[Field], next: u32) -> IfdRef {
        self.write_ifd_declaring(fields, fields.len() as u16, next)
    }

    /// Like `write_ifd` but with a declared entry count that may lie
    pub fn write_ifd_declaring(&mut self, fields: &[Field], declared: u16, next: u32) -> IfdRef {
        if self.buf.len() % 2 == 1 {
            self.buf.push(0);
        }

        let offset = self.len();
        let count = fields.len() as u32;
        let mut data_offset = offset + 2 + 12 * count + 4;
        let mut data = Vec::new();

        self.put_u16(declared);
        for field in fields {
            let encoded = self.encode(&field.content);
            self.put_u16(field.tag);
            self.put_u16(field.type_code);
            self.put_u32(field.count);

            match field.content {
                Content::Raw(value_field) => self.put_u32(value_field),
                _ if encoded.len() <= 4 => {
                    let mut inline = encoded.clone();
                    inline.resize(4, 0);
                    self.put_bytes(&inline);
                }
                _ => {
                    self.put_u32(data_offset);
                    data_offset += encoded.len() as u32;
                    data.extend_from_slice(&encoded);
                }
            }
        }
        self.put_u32(next);
        self.put_bytes(&data);

        IfdRef { offset, count }
    }

    /// Overwrites the value field of entry `index`
    pub fn patch_value(&mut self, ifd: IfdRef, index: u32, value: u32) {
        self.patch_u32(ifd.entry_offset(index) + 8, value);
    }

    pub fn patch_next(&mut self, ifd: IfdRef, next: u32) {
        self.patch_u32(ifd.next_field_offset(), next);
    }

    pub fn patch_first_ifd(&mut self, offset: u32) {
        self.patch_u32(4, offset);
    }

    pub fn patch_u32(&mut self, at: u32, value: u32) {
        let bytes = match self.order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        let at = at as usize;
        self.buf[at..at + 4].copy_from_slice(&bytes);
    }

    /// Cuts the data off at `length` bytes
    pub fn truncate(&mut self, length: u32) {
        self.buf.truncate(length as usize);
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn cursor(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.buf)
    }

    fn encode(&self, content: &Content) -> Vec<u8> {
        let mut scratch = TiffBuilder { order: self.order, buf: Vec::new() };
        match content {
            Content::Shorts(values) => values.iter().for_each(|&v| scratch.put_u16(v)),
            Content::Longs(values) => values.iter().for_each(|&v| scratch.put_u32(v)),
            Content::Rationals(values) => values.iter().for_each(|&(n, d)| {
                scratch.put_u32(n);
                scratch.put_u32(d);
            }),
            Content::Bytes(bytes) => scratch.put_bytes(bytes),
            Content::Raw(value) => scratch.put_u32(*value),
        }
        scratch.buf
    }
}

/// The ten IFD0 entries written by many camera firmwares
pub fn camera_ifd0_fields() -> Vec<Field> {
    vec![
        Field::ascii(271, "EASTMAN KODAK COMPANY"),
        Field::ascii(272, "KODAK DC210 ZOOM DIGITAL CAMERA"),
        Field::short(274, 1),
        Field::rational(282, 216, 1),
        Field::rational(283, 216, 1),
        Field::short(296, 2),
        Field::ascii(305, "Adobe Photoshop CS2 Macintosh"),
        Field::ascii(306, "2005:10:17 09:22:19"),
        Field::short(531, 1),
        Field::ascii(33432, "(c) 2005"),
    ]
}
