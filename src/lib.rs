//! Tolerant reader for EXIF/TIFF Image File Directories
//!
//! ```no_run
//! use std::fs::File;
//! use exifkit::{BoundedStream, DirectoryView, ExifReader, tags};
//!
//! let file = File::open("photo.tif").unwrap();
//! let mut stream = BoundedStream::from_offset(file, 0).unwrap();
//! let exif = ExifReader::new().read(&mut stream).unwrap();
//!
//! if let Some(entry) = exif.get_entry_by_id(tags::SOFTWARE) {
//!     println!("{}", entry.value());
//! }
//! ```

pub mod io;
pub mod exif;
pub mod commands;

pub use crate::exif::{
    tags, CompoundDirectory, Directory, DirectoryView, Entry, ExifError, ExifReader,
    ExifReaderBuilder, ExifResult, FieldType, IfdKind, TagNames, Value, ValueError,
};
pub use crate::io::bounded::BoundedStream;
pub use crate::io::byte_order::ByteOrder;
