//! Directory chain walker
//!
//! Follows the next-IFD offsets of the top-level directories. The first
//! directory must parse; later links that are unreadable, revisited or
//! outside the stream just end the chain.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::exif::directory::CompoundDirectory;
use crate::exif::errors::ExifResult;
use crate::exif::ifd_parser::IfdParser;
use crate::exif::types::IfdKind;
use crate::exif::validation;
use crate::io::seekable::SeekableReader;

/// Walks the top-level IFD chain
pub struct ChainWalker<'p, 'a> {
    parser: &'p IfdParser<'a>,
    max_directories: usize,
}

impl<'p, 'a> ChainWalker<'p, 'a> {
    pub fn new(parser: &'p IfdParser<'a>, max_directories: usize) -> Self {
        ChainWalker {
            parser,
            max_directories: max_directories.max(1),
        }
    }

    /// Parses the chain starting at `first_offset`
    pub fn walk(&self, reader: &mut dyn SeekableReader, first_offset: u64) -> ExifResult<CompoundDirectory> {
        let mut visited = HashSet::new();
        visited.insert(first_offset);

        let first = self.parser.parse(reader, first_offset, IfdKind::Tiff)?;
        let mut next_offset = first.next_offset;
        let mut chain = CompoundDirectory::new(first.directory);

        while let Some(offset) = next_offset {
            if chain.directory_count() >= self.max_directories {
                warn!("Stopping IFD chain after {} directories", self.max_directories);
                break;
            }

            if !visited.insert(offset) {
                warn!("IFD chain loops back to offset {}, stopping", offset);
                break;
            }

            if let Err(e) = validation::validate_ifd_offset(offset, self.parser.stream_length()) {
                warn!("Invalid next IFD offset, stopping IFD chain: {}", e);
                break;
            }

            debug!("Reading IFD #{} at offset {}", chain.directory_count(), offset);

            match self.parser.parse(reader, offset, IfdKind::Tiff) {
                Ok(parsed) => {
                    next_offset = parsed.next_offset;
                    chain.push(parsed.directory);
                }
                Err(e) => {
                    warn!("Error reading IFD #{}: {}", chain.directory_count(), e);
                    break;
                }
            }
        }

        info!("Read {} IFDs", chain.directory_count());
        Ok(chain)
    }
}
