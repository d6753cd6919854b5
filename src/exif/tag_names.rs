//! Tag name tables
//!
//! Names are looked up per directory kind, since GPS and Interop tags reuse
//! small ids that mean something else in a TIFF directory. Tables are TOML
//! documents with one section per kind:
//!
//! ```toml
//! [tiff]
//! 256 = "ImageWidth"
//!
//! [gps]
//! 1 = "GPSLatitudeRef"
//! ```

use std::collections::HashMap;
use std::fs;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::{debug, warn};

use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::types::IfdKind;

lazy_static! {
    static ref DEFAULT_TAG_NAMES: TagNames = {
        let content = include_str!("../../exif_tags.toml");
        content.parse::<TagNames>().unwrap_or_else(|e| {
            warn!("Failed to parse built-in tag names: {}", e);
            TagNames::default()
        })
    };
}

const KINDS: [IfdKind; 5] = [
    IfdKind::Tiff,
    IfdKind::Exif,
    IfdKind::Gps,
    IfdKind::Interop,
    IfdKind::SubImage,
];

/// Maps (directory kind, tag id) to a field name
#[derive(Debug, Default, Clone)]
pub struct TagNames {
    names: HashMap<IfdKind, HashMap<u16, String>>,
}

impl TagNames {
    /// The built-in TIFF/EXIF/GPS/Interop table
    pub fn exif() -> &'static TagNames {
        &DEFAULT_TAG_NAMES
    }

    /// Load a table from a TOML file
    pub fn from_file(path: &str) -> ExifResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ExifError::TagTableError(format!("Failed to read {}: {}", path, e)))?;
        content.parse()
    }

    /// Adds or replaces a name
    pub fn insert(&mut self, kind: IfdKind, tag: u16, name: &str) {
        self.names.entry(kind).or_default().insert(tag, name.to_string());
    }

    /// Name of `tag` in a directory of the given kind
    ///
    /// Sub-image directories share the TIFF namespace unless the table
    /// defines names for them explicitly.
    pub fn name(&self, kind: IfdKind, tag: u16) -> Option<&str> {
        let found = self.names.get(&kind).and_then(|names| names.get(&tag));

        match (found, kind) {
            (Some(name), _) => Some(name.as_str()),
            (None, IfdKind::SubImage) => self.name(IfdKind::Tiff, tag),
            (None, _) => None,
        }
    }

    /// Number of names across all kinds
    pub fn len(&self) -> usize {
        self.names.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromStr for TagNames {
    type Err = ExifError;

    /// Parse a table from a TOML string
    ///
    /// Unknown sections and keys that are not tag ids are ignored.
    fn from_str(content: &str) -> ExifResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| ExifError::TagTableError(format!("Failed to parse TOML: {}", e)))?;

        let mut table = TagNames::default();

        for kind in KINDS {
            let Some(section) = toml_value.get(kind.name()).and_then(|v| v.as_table()) else {
                continue;
            };

            for (k, v) in section {
                match (k.parse::<u16>(), v.as_str()) {
                    (Ok(tag), Some(name)) => table.insert(kind, tag, name),
                    _ => debug!("Skipping tag table key {}.{}", kind, k),
                }
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::constants::tags;

    #[test]
    fn test_default_table_has_namespaces() {
        let names = TagNames::exif();
        assert_eq!(names.name(IfdKind::Tiff, tags::SOFTWARE), Some("Software"));
        assert_eq!(names.name(IfdKind::Gps, tags::GPS_LATITUDE_REF), Some("GPSLatitudeRef"));
        assert_eq!(names.name(IfdKind::Interop, tags::INTEROP_INDEX), Some("InteroperabilityIndex"));
        assert_eq!(names.name(IfdKind::Exif, tags::EXPOSURE_TIME), Some("ExposureTime"));
        assert_eq!(names.name(IfdKind::SubImage, tags::IMAGE_WIDTH), Some("ImageWidth"));
        assert_eq!(names.name(IfdKind::Tiff, 1), None);
    }

    #[test]
    fn test_from_str_skips_bad_keys() {
        let names = r#"
            [tiff]
            256 = "Width"
            not_a_tag = "Ignored"
            257 = 12

            [unrelated]
            1 = "Nothing"
        "#.parse::<TagNames>().unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names.name(IfdKind::Tiff, 256), Some("Width"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(matches!("[tiff".parse::<TagNames>(), Err(ExifError::TagTableError(_))));
    }
}
