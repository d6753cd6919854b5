//! Directory entries

use std::fmt;

use crate::exif::types::FieldType;
use crate::exif::value::Value;

/// One tagged field of an Image File Directory
///
/// The tag id, field type and count are exactly what the entry record
/// declared, even when the value itself could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    tag: u16,
    field_name: Option<String>,
    field_type: FieldType,
    count: u32,
    value: Value,
}

impl Entry {
    pub(crate) fn new(
        tag: u16,
        field_name: Option<String>,
        field_type: FieldType,
        count: u32,
        value: Value,
    ) -> Self {
        Entry {
            tag,
            field_name,
            field_type,
            count,
            value,
        }
    }

    /// TIFF tag identifier
    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// Human readable name, if the tag table knows the tag
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Declared number of elements
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{} x{}]: {}",
               self.tag,
               self.field_name().unwrap_or("Unknown"),
               self.field_type,
               self.count,
               self.value)
    }
}
