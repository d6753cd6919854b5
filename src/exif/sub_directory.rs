//! Sub-directory resolver
//!
//! Pointer tags hold the offset of a nested IFD. Which tags count as
//! pointers depends on the kind of the directory holding them, and no kind
//! points back at itself, so recursion ends after at most three levels
//! (TIFF → EXIF → Interop).

use std::io::Cursor;

use log::{debug, warn};

use crate::exif::constants::tags;
use crate::exif::directory::DirectoryView;
use crate::exif::ifd_parser::IfdParser;
use crate::exif::types::IfdKind;
use crate::exif::value::{Value, ValueError};
use crate::io::seekable::SeekableReader;

/// Kind of the directory `tag` points at, if `tag` is a pointer in `parent`
pub fn nested_kind(parent: IfdKind, tag: u16) -> Option<IfdKind> {
    match (parent, tag) {
        (IfdKind::Tiff, tags::EXIF_IFD) => Some(IfdKind::Exif),
        (IfdKind::Tiff, tags::GPS_IFD) => Some(IfdKind::Gps),
        (IfdKind::Tiff, tags::SUB_IFDS) => Some(IfdKind::SubImage),
        (IfdKind::Exif, tags::INTEROP_IFD) => Some(IfdKind::Interop),
        _ => None,
    }
}

/// Replaces the offset(s) in `value` by the directories they point at
///
/// A pointer that cannot be followed, that leads to a directory without
/// entries, or that repeats an offset already read becomes an error marker.
/// Several offsets (SubIFDs) give a list with one item per offset.
pub fn resolve(
    parser: &IfdParser<'_>,
    reader: &mut dyn SeekableReader,
    tag: u16,
    value: Value,
    kind: IfdKind,
) -> Value {
    if value.is_error() {
        return value;
    }

    let offsets = match pointer_offsets(parser, &value) {
        Some(offsets) if !offsets.is_empty() => offsets,
        _ => {
            warn!("Pointer tag {} does not hold an offset: {}", tag, value);
            return Value::Error(ValueError::new(
                std::io::ErrorKind::InvalidData,
                format!("tag {} does not hold an IFD offset", tag),
            ));
        }
    };

    let mut resolved = Vec::with_capacity(offsets.len());
    for offset in offsets {
        resolved.push(parse_nested(parser, reader, tag, offset, kind));
    }

    if resolved.len() == 1 {
        resolved.swap_remove(0)
    } else {
        Value::List(resolved)
    }
}

fn parse_nested(
    parser: &IfdParser<'_>,
    reader: &mut dyn SeekableReader,
    tag: u16,
    offset: u64,
    kind: IfdKind,
) -> Value {
    if offset == 0 {
        warn!("Pointer tag {} holds offset 0", tag);
        return Value::Error(ValueError::new(
            std::io::ErrorKind::InvalidData,
            format!("tag {} points at offset 0", tag),
        ));
    }

    if !parser.claim_nested_offset(offset) {
        warn!("{} IFD at offset {} was already read, tag {} not followed", kind, offset, tag);
        return Value::Error(ValueError::new(
            std::io::ErrorKind::InvalidData,
            format!("{} IFD at offset {} already read", kind, offset),
        ));
    }

    debug!("Following tag {} to {} IFD at offset {}", tag, kind, offset);

    match parser.parse(reader, offset, kind) {
        Ok(parsed) if parsed.directory.is_empty() => {
            warn!("{} IFD at offset {} has no entries", kind, offset);
            Value::Error(ValueError::new(
                std::io::ErrorKind::InvalidData,
                format!("empty {} IFD at offset {}", kind, offset),
            ))
        }
        Ok(parsed) => Value::Directory(Box::new(parsed.directory)),
        Err(e) => {
            warn!("Failed to read {} IFD at offset {}: {}", kind, offset, e);
            Value::Error(ValueError::from(&e))
        }
    }
}

/// Offsets held by a pointer value
///
/// Writers use LONG, SHORT, the IFD type (decoded as LONG) and now and
/// then UNDEFINED with four bytes.
fn pointer_offsets(parser: &IfdParser<'_>, value: &Value) -> Option<Vec<u64>> {
    match value {
        Value::List(values) => values
            .iter()
            .map(|v| v.as_u32().map(u64::from))
            .collect(),
        Value::Undefined(bytes) if bytes.len() == 4 => {
            let mut cursor = Cursor::new(&bytes[..]);
            parser.handler().read_u32(&mut cursor).ok().map(|offset| vec![offset as u64])
        }
        _ => value.as_u32().map(|offset| vec![offset as u64]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_tags_per_kind() {
        assert_eq!(nested_kind(IfdKind::Tiff, tags::EXIF_IFD), Some(IfdKind::Exif));
        assert_eq!(nested_kind(IfdKind::Tiff, tags::GPS_IFD), Some(IfdKind::Gps));
        assert_eq!(nested_kind(IfdKind::Tiff, tags::SUB_IFDS), Some(IfdKind::SubImage));
        assert_eq!(nested_kind(IfdKind::Exif, tags::INTEROP_IFD), Some(IfdKind::Interop));
    }

    #[test]
    fn test_no_kind_points_at_itself() {
        assert_eq!(nested_kind(IfdKind::Exif, tags::EXIF_IFD), None);
        assert_eq!(nested_kind(IfdKind::Tiff, tags::INTEROP_IFD), None);
        assert_eq!(nested_kind(IfdKind::SubImage, tags::SUB_IFDS), None);
        assert_eq!(nested_kind(IfdKind::SubImage, tags::EXIF_IFD), None);
        assert_eq!(nested_kind(IfdKind::Gps, tags::GPS_IFD), None);
        assert_eq!(nested_kind(IfdKind::Interop, tags::INTEROP_IFD), None);
    }
}
