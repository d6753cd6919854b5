//! Type decoder
//!
//! Turns the raw bytes of an entry value into a `Value`, given the field
//! type and the byte order of the stream. The caller decides how many bytes
//! are available; only whole elements are decoded.

use std::io::Cursor;

use byteorder::ReadBytesExt;

use crate::exif::errors::ExifResult;
use crate::exif::types::FieldType;
use crate::exif::value::Value;
use crate::io::byte_order::ByteOrderHandler;

/// Decodes `bytes` as elements of `field_type`
///
/// One element decodes to a scalar, anything else (including zero
/// elements) to a `List`. ASCII always decodes to a string and UNDEFINED
/// always to raw bytes, whatever the count.
pub fn decode_value(
    field_type: FieldType,
    bytes: &[u8],
    handler: &dyn ByteOrderHandler,
) -> ExifResult<Value> {
    match field_type {
        FieldType::Ascii => return Ok(Value::Ascii(decode_ascii(bytes))),
        FieldType::Undefined => return Ok(Value::Undefined(bytes.to_vec())),
        _ => {}
    }

    let element_count = bytes.len() as u64 / field_type.element_size();
    let mut cursor = Cursor::new(bytes);
    let mut values = Vec::with_capacity(element_count as usize);

    for _ in 0..element_count {
        values.push(decode_element(field_type, &mut cursor, handler)?);
    }

    if values.len() == 1 {
        Ok(values.swap_remove(0))
    } else {
        Ok(Value::List(values))
    }
}

fn decode_element(
    field_type: FieldType,
    cursor: &mut Cursor<&[u8]>,
    handler: &dyn ByteOrderHandler,
) -> ExifResult<Value> {
    let value = match field_type {
        FieldType::Byte => Value::Byte(cursor.read_u8()?),
        FieldType::SByte => Value::SByte(cursor.read_i8()?),
        FieldType::Short => Value::Short(handler.read_u16(cursor)?),
        FieldType::SShort => Value::SShort(handler.read_i16(cursor)?),
        FieldType::Long => Value::Long(handler.read_u32(cursor)?),
        FieldType::SLong => Value::SLong(handler.read_i32(cursor)?),
        FieldType::Rational => {
            let (numerator, denominator) = handler.read_rational(cursor)?;
            Value::Rational(numerator, denominator)
        }
        FieldType::SRational => {
            let (numerator, denominator) = handler.read_srational(cursor)?;
            Value::SRational(numerator, denominator)
        }
        FieldType::Float => Value::Float(handler.read_f32(cursor)?),
        FieldType::Double => Value::Double(handler.read_f64(cursor)?),
        FieldType::Ascii | FieldType::Undefined => unreachable!("decoded as a whole"),
    };

    Ok(value)
}

/// Text up to the first NUL
///
/// Writers disagree on termination: some omit the NUL, some pad with
/// several, some store a count of 0. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn decode_ascii(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::{BigEndianHandler, LittleEndianHandler};

    #[test]
    fn test_single_element_is_scalar() {
        let value = decode_value(FieldType::Short, &[0x11, 0x0e], &LittleEndianHandler).unwrap();
        assert_eq!(value, Value::Short(3601));

        let value = decode_value(FieldType::Short, &[0x0e, 0x11], &BigEndianHandler).unwrap();
        assert_eq!(value, Value::Short(3601));
    }

    #[test]
    fn test_several_elements_are_a_list() {
        let value = decode_value(FieldType::Short, &[1, 0, 2, 0], &LittleEndianHandler).unwrap();
        assert_eq!(value, Value::List(vec![Value::Short(1), Value::Short(2)]));

        let empty = decode_value(FieldType::Long, &[], &LittleEndianHandler).unwrap();
        assert_eq!(empty, Value::List(vec![]));
    }

    #[test]
    fn test_rationals_keep_both_parts() {
        let bytes = [0, 0, 0, 72, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xfe, 0, 0, 0, 3];
        let value = decode_value(FieldType::SRational, &bytes, &BigEndianHandler).unwrap();
        assert_eq!(value, Value::List(vec![Value::SRational(72, 0), Value::SRational(-2, 3)]));
    }

    #[test]
    fn test_signed_and_float_types() {
        assert_eq!(decode_value(FieldType::SByte, &[0xff], &LittleEndianHandler).unwrap(),
                   Value::SByte(-1));
        assert_eq!(decode_value(FieldType::SLong, &[0xfe, 0xff, 0xff, 0xff], &LittleEndianHandler).unwrap(),
                   Value::SLong(-2));
        assert_eq!(decode_value(FieldType::Float, &1.5f32.to_be_bytes(), &BigEndianHandler).unwrap(),
                   Value::Float(1.5));
        assert_eq!(decode_value(FieldType::Double, &0.25f64.to_le_bytes(), &LittleEndianHandler).unwrap(),
                   Value::Double(0.25));
    }

    #[test]
    fn test_trailing_partial_element_is_ignored() {
        let value = decode_value(FieldType::Long, &[1, 0, 0, 0, 9, 9], &LittleEndianHandler).unwrap();
        assert_eq!(value, Value::Long(1));
    }

    #[test]
    fn test_ascii_termination_variants() {
        assert_eq!(decode_ascii(b""), "");
        assert_eq!(decode_ascii(b"Adobe\0"), "Adobe");
        assert_eq!(decode_ascii(b"Adobe"), "Adobe");
        assert_eq!(decode_ascii(b"A\0B\0"), "A");
        assert_eq!(decode_ascii(b"\0\0\0\0"), "");
    }

    #[test]
    fn test_undefined_keeps_raw_bytes() {
        let value = decode_value(FieldType::Undefined, b"0230", &LittleEndianHandler).unwrap();
        assert_eq!(value, Value::Undefined(b"0230".to_vec()));
    }
}
