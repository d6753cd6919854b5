//! Directory model
//!
//! A `Directory` is one parsed IFD: its entries in stream order. A
//! `CompoundDirectory` is the top-level chain of directories; its own entry
//! view is the one of the first directory, so consumers that only expect a
//! single directory can use it directly.

use std::fmt;
use std::ops::Index;
use std::slice;

use log::trace;

use crate::exif::entry::Entry;
use crate::exif::types::IfdKind;
use crate::exif::value::Value;

/// Read access shared by `Directory` and `CompoundDirectory`
pub trait DirectoryView {
    /// Entries in stream order
    fn entries(&self) -> &[Entry];

    /// Number of entries
    fn size(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// First entry with the given tag id
    fn get_entry_by_id(&self, tag: u16) -> Option<&Entry> {
        self.entries().iter().find(|entry| entry.tag() == tag)
    }

    /// First entry whose field name matches
    ///
    /// Names come from the tag table the reader was given; entries whose
    /// tag is not in the table cannot be found this way.
    fn get_entry_by_field_name(&self, name: &str) -> Option<&Entry> {
        self.entries().iter().find(|entry| entry.field_name() == Some(name))
    }

    /// Value of the first entry with the given tag id
    fn get_value(&self, tag: u16) -> Option<&Value> {
        self.get_entry_by_id(tag).map(Entry::value)
    }

    fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries().iter()
    }
}

/// A single Image File Directory
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    kind: IfdKind,
    offset: u64,
    entries: Vec<Entry>,
}

impl Directory {
    pub(crate) fn new(kind: IfdKind, offset: u64) -> Self {
        Directory {
            kind,
            offset,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add_entry(&mut self, entry: Entry) {
        trace!("Adding entry to {} IFD at {}: {}", self.kind, self.offset, entry);
        self.entries.push(entry);
    }

    /// Role of this directory
    pub fn kind(&self) -> IfdKind {
        self.kind
    }

    /// Offset of the directory in the stream
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        writeln!(f, "{}{} IFD (offset: {}, entries: {})", pad, self.kind, self.offset, self.entries.len())?;

        for entry in &self.entries {
            match entry.value() {
                Value::Directory(nested) => {
                    writeln!(f, "{}  {} ({}):", pad, entry.tag(), entry.field_name().unwrap_or("Unknown"))?;
                    nested.fmt_indented(f, indent + 2)?;
                }
                Value::List(values) if values.iter().any(|v| v.as_directory().is_some()) => {
                    writeln!(f, "{}  {} ({}):", pad, entry.tag(), entry.field_name().unwrap_or("Unknown"))?;
                    for value in values {
                        match value.as_directory() {
                            Some(nested) => nested.fmt_indented(f, indent + 2)?,
                            None => writeln!(f, "{}    {}", pad, value)?,
                        }
                    }
                }
                _ => writeln!(f, "{}  {}", pad, entry)?,
            }
        }

        Ok(())
    }
}

impl DirectoryView for Directory {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// The top-level chain of directories
///
/// Always holds at least one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundDirectory {
    directories: Vec<Directory>,
}

impl CompoundDirectory {
    pub(crate) fn new(first: Directory) -> Self {
        CompoundDirectory {
            directories: vec![first],
        }
    }

    pub(crate) fn push(&mut self, directory: Directory) {
        self.directories.push(directory);
    }

    /// Number of directories in the chain
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Directory at `index` in the chain
    ///
    /// # Panics
    /// If `index >= directory_count()`.
    pub fn directory(&self, index: usize) -> &Directory {
        match self.directories.get(index) {
            Some(directory) => directory,
            None => panic!("directory index {} out of range (directory count: {})",
                           index, self.directories.len()),
        }
    }

    /// Directory at `index`, or `None` when out of range
    pub fn get_directory(&self, index: usize) -> Option<&Directory> {
        self.directories.get(index)
    }

    /// All directories of the chain in order
    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    /// Consumes the chain, returning the first directory
    pub fn into_first(self) -> Directory {
        let mut directories = self.directories;
        directories.swap_remove(0)
    }
}

impl DirectoryView for CompoundDirectory {
    fn entries(&self) -> &[Entry] {
        self.directories[0].entries()
    }
}

impl Index<usize> for CompoundDirectory {
    type Output = Directory;

    fn index(&self, index: usize) -> &Directory {
        self.directory(index)
    }
}

impl fmt::Display for CompoundDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Directories: {}", self.directories.len())?;
        for (number, directory) in self.directories.iter().enumerate() {
            writeln!(f, "IFD #{}", number)?;
            directory.fmt_indented(f, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::types::FieldType;

    fn directory_with(tags: &[u16]) -> Directory {
        let mut directory = Directory::new(IfdKind::Tiff, 8);
        for &tag in tags {
            directory.add_entry(Entry::new(tag, None, FieldType::Short, 1, Value::Short(tag)));
        }
        directory
    }

    #[test]
    fn test_compound_mirrors_first_directory() {
        let mut compound = CompoundDirectory::new(directory_with(&[256, 257, 259]));
        compound.push(directory_with(&[256]));

        assert_eq!(compound.directory_count(), 2);
        assert_eq!(compound.size(), 3);
        assert_eq!(compound.size(), compound.directory(0).size());
        assert_eq!(compound.get_entry_by_id(259), compound.directory(0).get_entry_by_id(259));
        assert_eq!(compound[1].size(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_directory_index_out_of_range_panics() {
        let compound = CompoundDirectory::new(directory_with(&[256]));
        compound.directory(compound.directory_count());
    }

    #[test]
    fn test_duplicate_tags_keep_order_and_lookup_first() {
        let mut directory = Directory::new(IfdKind::Tiff, 8);
        directory.add_entry(Entry::new(305, None, FieldType::Short, 1, Value::Short(1)));
        directory.add_entry(Entry::new(305, None, FieldType::Short, 1, Value::Short(2)));

        assert_eq!(directory.size(), 2);
        assert_eq!(directory.get_value(305), Some(&Value::Short(1)));
        let values: Vec<_> = directory.iter().map(|e| e.value().clone()).collect();
        assert_eq!(values, vec![Value::Short(1), Value::Short(2)]);
    }

    #[test]
    fn test_lookup_by_field_name() {
        let mut directory = Directory::new(IfdKind::Tiff, 8);
        directory.add_entry(Entry::new(305, Some("Software".into()), FieldType::Ascii, 5,
                                       Value::Ascii("test".into())));
        directory.add_entry(Entry::new(40000, None, FieldType::Short, 1, Value::Short(0)));

        assert_eq!(directory.get_entry_by_field_name("Software").map(Entry::tag), Some(305));
        assert!(directory.get_entry_by_field_name("Unknown").is_none());
    }
}
