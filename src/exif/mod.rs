//! EXIF/TIFF Image File Directory parsing
//!
//! This module reads TIFF structured metadata (EXIF segments, TIFF file
//! headers) into a tree of directories and entries. Damaged data is read
//! as far as it goes instead of being rejected.

pub mod errors;
pub(crate) mod constants;
pub mod types;
pub mod value;
pub mod entry;
pub mod directory;
pub mod tag_names;
pub mod decoder;
pub(crate) mod entry_reader;
pub(crate) mod ifd_parser;
pub(crate) mod sub_directory;
pub(crate) mod chain;
pub(crate) mod validation;
pub mod reader;
#[cfg(test)]
mod tests;

pub use constants::tags;
pub use directory::{CompoundDirectory, Directory, DirectoryView};
pub use entry::Entry;
pub use errors::{ExifError, ExifResult};
pub use reader::{ExifReader, ExifReaderBuilder};
pub use tag_names::TagNames;
pub use types::{FieldType, IfdKind};
pub use value::{Value, ValueError};
