// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    clap::{Arg, ArgMatches, Command},
    debian_contents::{
        error::ContentsError,
        io::Compression,
        ranking::{rank, render},
        repository::{
            contents::ContentsFile, download_contents_file, reader_from_str, ContentsIndexFetch,
            DEFAULT_MIRROR_URL,
        },
    },
    log::{info, LevelFilter},
    std::{path::PathBuf, str::FromStr},
    thiserror::Error,
};

const ABOUT: &str = "\
Print the packages installing the most files.

This command downloads the `Contents` index for an architecture from a Debian
mirror, decompresses it, and counts how many files each package installs. The
packages with the highest counts are printed as a table.

The downloaded index is written to `<output_dir>/<arch>.gz` (or
`udeb-<arch>.gz` for installer packages) and decompressed to
`<output_dir>/<arch>` (or `udeb-<arch>`). Both files are left in place.

# Mirror URLs

The mirror URL is the directory containing `Contents-*` files. This is
typically a component directory of a distribution, e.g.
`http://ftp.uk.debian.org/debian/dists/stable/main/`.

If a value contains `://`, it will be parsed as a URL. `http://`, `https://`
and `file://` URLs are supported. Otherwise it will be interpreted as a local
filesystem path.
";

#[derive(Debug, Error)]
pub enum DctError {
    #[error("argument parsing error: {0}")]
    Clap(#[from] clap::Error),

    #[error("{0}")]
    Contents(#[from] ContentsError),

    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DctError>;

fn command() -> Command<'static> {
    Command::new("Debian Contents Tool")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gregory Szorc <gregory.szorc@gmail.com>")
        .about("Print the Debian packages installing the most files")
        .long_about(ABOUT)
        .arg(
            Arg::new("arch")
                .required(true)
                .help("Architecture of the Contents index to parse (e.g. amd64)"),
        )
        .arg(
            Arg::new("mirror_url")
                .short('m')
                .long("mirror_url")
                .takes_value(true)
                .default_value(DEFAULT_MIRROR_URL)
                .help("Debian mirror URL to fetch the Contents index from"),
        )
        .arg(
            Arg::new("udeb")
                .short('u')
                .long("udeb")
                .help("Fetch the index of installer packages (udebs)"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output_dir")
                .takes_value(true)
                .allow_invalid_utf8(true)
                .help("Directory to store downloaded files in [default: current directory]"),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .takes_value(true)
                .default_value("10")
                .help("Maximum number of packages to print"),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .takes_value(true)
                .possible_values(["gz", "xz", "bz2", "lzma", "none"])
                .default_value("gz")
                .help("Compression format of the index to fetch"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .multiple_occurrences(true)
                .help("Increase logging verbosity. Can be specified multiple times"),
        )
}

fn init_logging(verbosity: u64) {
    let log_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.as_str()),
    );

    // Disable log context and TLS chatter except at higher log levels.
    if log_level <= LevelFilter::Info {
        builder
            .format_timestamp(None)
            .format_level(false)
            .format_target(false)
            .filter_module("rustls", LevelFilter::Error);
    }

    builder.init();
}

pub async fn run_cli() -> Result<()> {
    let matches = command().try_get_matches()?;

    init_logging(matches.occurrences_of("verbose"));

    command_top_packages(&matches).await
}

async fn command_top_packages(args: &ArgMatches) -> Result<()> {
    let arch = args.value_of("arch").expect("arch argument is required");
    let mirror_url = args
        .value_of("mirror_url")
        .expect("mirror_url argument has default value");
    let limit = args.value_of_t::<usize>("limit")?;
    let compression = Compression::from_str(
        args.value_of("compression")
            .expect("compression argument has default value"),
    )?;

    let output_dir = match args.value_of_os("output_dir") {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };

    let fetch =
        ContentsIndexFetch::new(arch, args.is_present("udeb")).with_compression(compression);
    let resolver = reader_from_str(mirror_url)?;

    let contents_path = download_contents_file(resolver.as_ref(), &fetch, &output_dir).await?;

    let contents = ContentsFile::from_path(&contents_path)?;
    info!("{} packages in {}", contents.len(), contents_path.display());

    print!("{}", render(&rank(&contents), limit));

    Ok(())
}
