//! Field types and directory kinds

use std::fmt;

use log::debug;

use crate::exif::constants::field_types;

/// The twelve TIFF 6.0 field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
}

impl FieldType {
    /// Maps a type code from an entry record to a field type
    ///
    /// The IFD type (13) has the layout of LONG. Any other unknown code is
    /// read as raw bytes.
    pub fn from_code(code: u16) -> FieldType {
        match code {
            field_types::BYTE => FieldType::Byte,
            field_types::ASCII => FieldType::Ascii,
            field_types::SHORT => FieldType::Short,
            field_types::LONG | field_types::IFD => FieldType::Long,
            field_types::RATIONAL => FieldType::Rational,
            field_types::SBYTE => FieldType::SByte,
            field_types::UNDEFINED => FieldType::Undefined,
            field_types::SSHORT => FieldType::SShort,
            field_types::SLONG => FieldType::SLong,
            field_types::SRATIONAL => FieldType::SRational,
            field_types::FLOAT => FieldType::Float,
            field_types::DOUBLE => FieldType::Double,
            _ => {
                debug!("Unknown field type: {}, reading as UNDEFINED", code);
                FieldType::Undefined
            }
        }
    }

    /// The TIFF type code of this field type
    pub fn code(&self) -> u16 {
        match self {
            FieldType::Byte => field_types::BYTE,
            FieldType::Ascii => field_types::ASCII,
            FieldType::Short => field_types::SHORT,
            FieldType::Long => field_types::LONG,
            FieldType::Rational => field_types::RATIONAL,
            FieldType::SByte => field_types::SBYTE,
            FieldType::Undefined => field_types::UNDEFINED,
            FieldType::SShort => field_types::SSHORT,
            FieldType::SLong => field_types::SLONG,
            FieldType::SRational => field_types::SRATIONAL,
            FieldType::Float => field_types::FLOAT,
            FieldType::Double => field_types::DOUBLE,
        }
    }

    /// Size in bytes of one element of this type
    pub fn element_size(&self) -> u64 {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Type name as used in the TIFF spec
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The role of a directory, which decides its tag namespace and which
/// pointer tags it may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfdKind {
    /// A directory of the top-level chain (IFD0, IFD1 thumbnail, ...)
    Tiff,
    /// EXIF private IFD
    Exif,
    /// GPS IFD
    Gps,
    /// Interoperability IFD
    Interop,
    /// Image directory reached through the SubIFDs tag
    SubImage,
}

impl IfdKind {
    /// Name of this kind, also the section name in tag tables
    pub fn name(&self) -> &'static str {
        match self {
            IfdKind::Tiff => "tiff",
            IfdKind::Exif => "exif",
            IfdKind::Gps => "gps",
            IfdKind::Interop => "interop",
            IfdKind::SubImage => "sub_image",
        }
    }
}

impl fmt::Display for IfdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
