//! Directory summary command
//!
//! Lists each directory with its entry count, nested directories and the
//! number of entries whose value could not be read.

use clap::ArgMatches;

use crate::commands::command_traits::Command;
use crate::commands::input::InputOptions;
use crate::exif::directory::{Directory, DirectoryView};
use crate::exif::errors::ExifResult;
use crate::exif::value::Value;

pub struct SummaryCommand {
    input: InputOptions,
}

impl SummaryCommand {
    pub fn new(args: &ArgMatches) -> ExifResult<Self> {
        Ok(SummaryCommand {
            input: InputOptions::from_args(args)?,
        })
    }

    fn print_directory(&self, label: &str, directory: &Directory, depth: usize) {
        let errors = directory.iter().filter(|entry| entry.value().is_error()).count();
        println!("{:indent$}{} ({} IFD at offset {}): {} entries, {} unreadable",
                 "", label, directory.kind(), directory.offset(), directory.size(), errors,
                 indent = depth * 2);

        for entry in directory {
            let name = entry.field_name().map(str::to_string)
                .unwrap_or_else(|| format!("tag {}", entry.tag()));
            match entry.value() {
                Value::Directory(nested) => self.print_directory(&name, nested, depth + 1),
                Value::List(values) => {
                    for (i, value) in values.iter().enumerate() {
                        if let Some(nested) = value.as_directory() {
                            self.print_directory(&format!("{}[{}]", name, i), nested, depth + 1);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl Command for SummaryCommand {
    fn execute(&self) -> ExifResult<()> {
        let directories = self.input.read()?;

        println!("{}: {} directories", self.input.input_file, directories.directory_count());
        for (index, directory) in directories.directories().iter().enumerate() {
            self.print_directory(&format!("IFD #{}", index), directory, 0);
        }

        Ok(())
    }
}
