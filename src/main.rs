use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};
use std::process;

use exifkit::commands::{CommandFactory, ExifkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("exifkit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Dump EXIF/TIFF directory structures")
        .arg(
            Arg::new("input")
                .help("Input file holding a TIFF structure")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log parser progress (repeat for more detail)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("offset")
                .long("offset")
                .help("Byte offset of the TIFF header within the file")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .required(false),
        )
        .arg(
            Arg::new("length")
                .long("length")
                .help("Length of the TIFF structure, defaults to the rest of the file")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .required(false),
        )
        .arg(
            Arg::new("tags")
                .long("tags")
                .help("TOML tag name table to use instead of the built-in one")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("first-only")
                .long("first-only")
                .help("Read IFD0 only, ignoring the next-IFD chain")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-sub-dirs")
                .long("no-sub-dirs")
                .help("Keep pointer tags as plain offsets")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("summary")
                .short('s')
                .long("summary")
                .help("Print entry counts per directory instead of every entry")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let factory = ExifkitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
