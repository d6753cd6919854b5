//! EXIF/TIFF directory reader
//!
//! Entry point of the crate. The reader reads the TIFF header at the start
//! of the stream, detects the byte order and walks the directory chain.

use log::{debug, info};
use std::io::SeekFrom;

use crate::exif::chain::ChainWalker;
use crate::exif::constants::header;
use crate::exif::directory::{CompoundDirectory, Directory, DirectoryView};
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::ifd_parser::IfdParser;
use crate::exif::tag_names::TagNames;
use crate::exif::types::IfdKind;
use crate::exif::validation;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;

/// Upper bound on top-level directories, on top of the loop guard
pub const DEFAULT_MAX_DIRECTORIES: usize = 100;

/// Builder for ExifReader
///
/// ```
/// use exifkit::{ExifReaderBuilder, TagNames};
///
/// let names = "[tiff]\n305 = \"Software\"".parse::<TagNames>().unwrap();
/// let reader = ExifReaderBuilder::new()
///     .tag_names(&names)
///     .read_all_directories(false)
///     .build();
/// ```
pub struct ExifReaderBuilder<'a> {
    names: &'a TagNames,
    read_all_directories: bool,
    resolve_sub_directories: bool,
    max_directories: usize,
}

impl ExifReaderBuilder<'static> {
    /// Create a builder using the built-in tag names
    pub fn new() -> Self {
        ExifReaderBuilder {
            names: TagNames::exif(),
            read_all_directories: true,
            resolve_sub_directories: true,
            max_directories: DEFAULT_MAX_DIRECTORIES,
        }
    }
}

impl Default for ExifReaderBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ExifReaderBuilder<'a> {
    /// Use another tag name table
    pub fn tag_names<'b>(self, names: &'b TagNames) -> ExifReaderBuilder<'b> {
        ExifReaderBuilder {
            names,
            read_all_directories: self.read_all_directories,
            resolve_sub_directories: self.resolve_sub_directories,
            max_directories: self.max_directories,
        }
    }

    /// Follow the next-IFD chain past IFD0 (default: true)
    pub fn read_all_directories(mut self, enabled: bool) -> Self {
        self.read_all_directories = enabled;
        self
    }

    /// Replace pointer tag offsets by the directories they point at
    /// (default: true)
    pub fn resolve_sub_directories(mut self, enabled: bool) -> Self {
        self.resolve_sub_directories = enabled;
        self
    }

    /// Maximum number of top-level directories read
    pub fn max_directories(mut self, max: usize) -> Self {
        self.max_directories = max;
        self
    }

    /// Build the ExifReader
    pub fn build(self) -> ExifReader<'a> {
        ExifReader {
            names: self.names,
            read_all_directories: self.read_all_directories,
            resolve_sub_directories: self.resolve_sub_directories,
            max_directories: self.max_directories,
        }
    }
}

/// Reader for TIFF structured metadata
///
/// The reader holds configuration only; every call parses its stream from
/// scratch and returns an independent tree.
pub struct ExifReader<'a> {
    names: &'a TagNames,
    read_all_directories: bool,
    resolve_sub_directories: bool,
    max_directories: usize,
}

impl ExifReader<'static> {
    /// A reader with default options and the built-in tag names
    pub fn new() -> Self {
        ExifReaderBuilder::new().build()
    }
}

impl Default for ExifReader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ExifReader<'a> {
    /// Reads the directory chain from a stream starting at a TIFF header
    ///
    /// Offsets in the data are taken relative to the start of `reader`.
    /// Fails only if the header or the first directory cannot be read;
    /// everything else that is damaged is skipped or marked in the tree.
    pub fn read(&self, reader: &mut dyn SeekableReader) -> ExifResult<CompoundDirectory> {
        debug!("ExifReader::read starting");

        let stream_length = validation::get_stream_length(reader)?;
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        let handler = byte_order.create_handler();

        let version = handler.read_u16(reader)?;
        if version != header::TIFF_VERSION {
            return Err(ExifError::UnsupportedVersion(version));
        }

        let first_ifd_offset = handler.read_u32(reader)? as u64;
        debug!("First IFD offset: {}", first_ifd_offset);

        let parser = IfdParser::new(
            handler.as_ref(),
            self.names,
            stream_length,
            self.resolve_sub_directories,
        );

        let directories = if self.read_all_directories {
            ChainWalker::new(&parser, self.max_directories).walk(reader, first_ifd_offset)?
        } else {
            let parsed = parser.parse(reader, first_ifd_offset, IfdKind::Tiff)?;
            CompoundDirectory::new(parsed.directory)
        };

        info!("Read {} directories ({}), {} entries in IFD0",
              directories.directory_count(), byte_order.name(),
              directories.size());

        Ok(directories)
    }

    /// Reads only IFD0, for consumers that expect a single directory
    pub fn read_directory(&self, reader: &mut dyn SeekableReader) -> ExifResult<Directory> {
        let single = ExifReader {
            names: self.names,
            read_all_directories: false,
            resolve_sub_directories: self.resolve_sub_directories,
            max_directories: 1,
        };

        Ok(single.read(reader)?.into_first())
    }
}
