//! Error types for EXIF/TIFF directory parsing
//!
//! Only failures that make the whole read impossible surface as
//! `ExifError`. Damage local to one directory or one entry is absorbed by
//! the parser and shows up in the shape of the returned tree.

use std::fmt;
use std::io;

/// Fatal parse errors
#[derive(Debug)]
pub enum ExifError {
    /// I/O error
    IoError(io::Error),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Directory offset outside the readable window
    InvalidOffset { offset: u64, length: u64 },
    /// Tag name table could not be loaded
    TagTableError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for ExifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExifError::IoError(e) => write!(f, "I/O error: {}", e),
            ExifError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            ExifError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            ExifError::InvalidOffset { offset, length } => {
                write!(f, "Invalid IFD offset: {} (stream length: {})", offset, length)
            }
            ExifError::TagTableError(msg) => write!(f, "Tag table error: {}", msg),
            ExifError::GenericError(msg) => write!(f, "EXIF error: {}", msg),
        }
    }
}

impl std::error::Error for ExifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExifError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExifError {
    fn from(error: io::Error) -> Self {
        ExifError::IoError(error)
    }
}

impl From<String> for ExifError {
    fn from(msg: String) -> Self {
        ExifError::GenericError(msg)
    }
}

/// Result type for EXIF operations
pub type ExifResult<T> = Result<T, ExifError>;
