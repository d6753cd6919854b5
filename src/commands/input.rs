//! Input options shared by the commands

use std::fs::File;

use clap::ArgMatches;
use log::debug;

use crate::exif::directory::CompoundDirectory;
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::reader::ExifReaderBuilder;
use crate::exif::tag_names::TagNames;
use crate::io::bounded::BoundedStream;

/// Where the TIFF structure lives and how to read it
pub struct InputOptions {
    /// Path to the input file
    pub input_file: String,
    /// Start of the TIFF header within the file
    pub offset: u64,
    /// Length of the window, up to the end of the file if absent
    pub length: Option<u64>,
    /// TOML tag name table replacing the built-in one
    pub tags_file: Option<String>,
    pub first_only: bool,
    pub resolve_sub_directories: bool,
}

impl InputOptions {
    pub fn from_args(args: &ArgMatches) -> ExifResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| ExifError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(InputOptions {
            input_file,
            offset: args.get_one::<u64>("offset").copied().unwrap_or(0),
            length: args.get_one::<u64>("length").copied(),
            tags_file: args.get_one::<String>("tags").cloned(),
            first_only: args.get_flag("first-only"),
            resolve_sub_directories: !args.get_flag("no-sub-dirs"),
        })
    }

    /// Opens the window and reads its directory chain
    pub fn read(&self) -> ExifResult<CompoundDirectory> {
        let custom_names;
        let names = match &self.tags_file {
            Some(path) => {
                custom_names = TagNames::from_file(path)?;
                &custom_names
            }
            None => TagNames::exif(),
        };

        let file = File::open(&self.input_file)?;
        let mut stream = match self.length {
            Some(length) => BoundedStream::new(file, self.offset, length)?,
            None => BoundedStream::from_offset(file, self.offset)?,
        };
        debug!("Reading {} bytes of {} from offset {}", stream.len(), self.input_file, self.offset);

        let reader = ExifReaderBuilder::new()
            .tag_names(names)
            .read_all_directories(!self.first_only)
            .resolve_sub_directories(self.resolve_sub_directories)
            .build();

        reader.read(&mut stream)
    }
}
