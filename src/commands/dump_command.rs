//! Directory tree dump command

use clap::ArgMatches;

use crate::commands::command_traits::Command;
use crate::commands::input::InputOptions;
use crate::exif::errors::ExifResult;

/// Prints every directory with all of its entries
pub struct DumpCommand {
    input: InputOptions,
}

impl DumpCommand {
    pub fn new(args: &ArgMatches) -> ExifResult<Self> {
        Ok(DumpCommand {
            input: InputOptions::from_args(args)?,
        })
    }
}

impl Command for DumpCommand {
    fn execute(&self) -> ExifResult<()> {
        let directories = self.input.read()?;
        print!("{}", directories);
        Ok(())
    }
}
