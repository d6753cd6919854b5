//! Decoded entry values
//!
//! `Value` is a closed set of shapes. Scalars are used when an entry holds
//! exactly one element, `List` when it holds several. Pointer tags hold the
//! nested `Directory` they point at, and a value that could not be read
//! holds an `Error` marker instead of failing the parse.

use std::fmt;
use std::io;

use crate::exif::directory::{Directory, DirectoryView};
use crate::exif::errors::ExifError;

/// Value of a directory entry
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    SByte(i8),
    Short(u16),
    SShort(i16),
    Long(u32),
    SLong(i32),
    /// Unreduced numerator/denominator pair, zero denominators included
    Rational(u32, u32),
    SRational(i32, i32),
    Float(f32),
    Double(f64),
    Ascii(String),
    /// Raw bytes of UNDEFINED and unknown field types
    Undefined(Vec<u8>),
    List(Vec<Value>),
    Directory(Box<Directory>),
    /// The value could not be resolved
    Error(ValueError),
}

/// Failure recorded in place of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    kind: io::ErrorKind,
    message: String,
}

impl ValueError {
    pub fn new(kind: io::ErrorKind, message: impl Into<String>) -> Self {
        ValueError {
            kind,
            message: message.into(),
        }
    }

    /// Nothing could be read at `offset` before the end of data
    pub fn eof(offset: u64, expected: u64) -> Self {
        ValueError::new(
            io::ErrorKind::UnexpectedEof,
            format!("read past end of data: {} bytes expected at offset {}", expected, offset),
        )
    }

    /// The kind of the underlying read failure
    pub fn kind(&self) -> io::ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the failure was hitting the end of the stream
    pub fn is_eof(&self) -> bool {
        self.kind == io::ErrorKind::UnexpectedEof
    }
}

impl From<&io::Error> for ValueError {
    fn from(error: &io::Error) -> Self {
        ValueError::new(error.kind(), error.to_string())
    }
}

impl From<&ExifError> for ValueError {
    fn from(error: &ExifError) -> Self {
        match error {
            ExifError::IoError(e) => ValueError::from(e),
            ExifError::InvalidOffset { .. } => {
                ValueError::new(io::ErrorKind::UnexpectedEof, error.to_string())
            }
            _ => ValueError::new(io::ErrorKind::InvalidData, error.to_string()),
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Value {
    /// Whether this is an error marker
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_error(&self) -> Option<&ValueError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Unsigned integer scalar widened to u32
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::Byte(v) => Some(v as u32),
            Value::Short(v) => Some(v as u32),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Signed or unsigned integer scalar widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::SByte(v) => Some(v as i64),
            Value::SShort(v) => Some(v as i64),
            Value::SLong(v) => Some(v as i64),
            _ => self.as_u32().map(i64::from),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Undefined(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Value::Directory(directory) => Some(directory),
            _ => None,
        }
    }

    /// Rational as a float, `None` for a zero denominator
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Rational(n, d) if d != 0 => Some(n as f64 / d as f64),
            Value::SRational(n, d) if d != 0 => Some(n as f64 / d as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{}", v),
            Value::SByte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::SShort(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::SLong(v) => write!(f, "{}", v),
            Value::Rational(n, d) => write!(f, "{}/{}", n, d),
            Value::SRational(n, d) => write!(f, "{}/{}", n, d),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Ascii(s) => write!(f, "\"{}\"", s),
            Value::Undefined(bytes) => {
                if bytes.len() > 16 {
                    write!(f, "<{} bytes>", bytes.len())
                } else {
                    write!(f, "{:02x?}", bytes)
                }
            }
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Directory(directory) => {
                write!(f, "<{} IFD, {} entries>", directory.kind(), directory.size())
            }
            Value::Error(e) => write!(f, "<error: {}>", e),
        }
    }
}
