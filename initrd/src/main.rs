//TODO: update clap to remove the need for this
#![allow(dangerous_implicit_autorefs)]

use std::path::Path;

use clap::{crate_description, crate_name, crate_version, App, Arg};
use initrd::ArchiveBuilder;

/// Where the boot image build expects to find the initrd
const DEFAULT_OUTPUT: &str = "iso/modules/initrd";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let help_output = format!("Archive file to write (defaults to '{}')", DEFAULT_OUTPUT);

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::with_name("output")
                .help(&help_output)
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            Arg::with_name("no-sort")
                .help("Keep the directory's enumeration order instead of sorting by name")
                .long("no-sort"),
        )
        .arg(
            Arg::with_name("dir")
                .help("Directory whose files are archived (not recursive)")
                .required(true)
                .index(1)
                .value_name("DIR"),
        )
        .get_matches();

    let mut builder = ArchiveBuilder::new();
    builder
        .sort(!matches.is_present("no-sort"))
        .dir(Path::new(matches.value_of_os("dir").unwrap()))?;
    builder.write_to(Path::new(matches.value_of_os("output").unwrap()))?;

    Ok(())
}
