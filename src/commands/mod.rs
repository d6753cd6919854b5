//! CLI command implementations
//!
//! This module contains the commands of the `exifkit` tool, built on the
//! Command pattern.

pub mod command_traits;
pub mod input;
pub mod dump_command;
pub mod summary_command;

pub use command_traits::{Command, CommandFactory};
pub use dump_command::DumpCommand;
pub use summary_command::SummaryCommand;

use clap::ArgMatches;
use crate::exif::errors::ExifResult;

/// Factory for creating command instances based on CLI arguments
pub struct ExifkitCommandFactory;

impl ExifkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ExifkitCommandFactory
    }
}

impl Default for ExifkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for ExifkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> ExifResult<Box<dyn Command>> {
        if args.get_flag("summary") {
            Ok(Box::new(SummaryCommand::new(args)?))
        } else {
            // Default to the full dump
            Ok(Box::new(DumpCommand::new(args)?))
        }
    }
}
