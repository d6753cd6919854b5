//! Stream and offset validation

use log::warn;
use std::io::SeekFrom;

use crate::exif::constants::{header, layout};
use crate::exif::errors::{ExifError, ExifResult};
use crate::io::seekable::SeekableReader;

/// Length of the stream, leaving the position where it was
pub fn get_stream_length(reader: &mut dyn SeekableReader) -> ExifResult<u64> {
    let current_position = reader.stream_position()?;
    let length = reader.seek(SeekFrom::End(0)).map_err(|e| {
        warn!("Could not determine stream length: {}", e);
        ExifError::from(e)
    })?;
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(length)
}

/// Checks that a later link of the top-level chain can start at `offset`
///
/// Linked directories cannot overlap the header and need room for their
/// entry count before the end of the stream. The first directory is only
/// held to the second rule, by the parser itself.
pub fn validate_ifd_offset(offset: u64, stream_length: u64) -> ExifResult<()> {
    if offset < header::HEADER_SIZE
        || offset.saturating_add(layout::ENTRY_COUNT_SIZE) > stream_length
    {
        return Err(ExifError::InvalidOffset {
            offset,
            length: stream_length,
        });
    }

    Ok(())
}
