//! kempa command-line front end.
//!
//! Thin glue over the codec: read all of stdin, apply exactly one of
//! compress/decompress, write all of stdout. Failure messages go to stderr
//! and the process exits with code 1; nothing is written to stdout on
//! failure.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{arg, ArgMatches, Command};

use kempa::{compress, decompress, Dictionary, EffortProfile};

fn cli() -> Command {
    Command::new("kempa")
        .version(kempa::VERSION)
        .about("kempa compression/decompression utility")
        .override_usage("kempa [-c|-d] [--dict dictionary.dict] < input > output")
        .arg(arg!(-c --compress "Compress input"))
        .arg(arg!(-d --decompress "Decompress input").conflicts_with("compress"))
        .arg(arg!(--dict <FILE> "Dictionary file for compression/decompression").required(false))
        .arg(arg!(--faster "Compress faster, but with a minor compression loss"))
        .arg(
            arg!(--slower "Compress more, but a lot slower")
                .conflicts_with("faster"),
        )
}

fn main() -> ExitCode {
    env_logger::init();

    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kempa: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let do_compress = matches.get_flag("compress");
    let do_decompress = matches.get_flag("decompress");
    if !do_compress && !do_decompress {
        return Err("exactly one of -c or -d must be given (see --help)".into());
    }

    // The dictionary file is read once at startup and reused for the call.
    let dictionary = match matches.get_one::<String>("dict") {
        Some(path) => Some(Dictionary::new(&std::fs::read(path)?)?),
        None => None,
    };

    let profile = if matches.get_flag("faster") {
        EffortProfile::Fast
    } else if matches.get_flag("slower") {
        EffortProfile::MaxCompression
    } else {
        EffortProfile::Balanced
    };

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let output = if do_compress {
        compress(profile, dictionary.as_ref(), &input)
    } else {
        decompress(dictionary.as_ref(), &input)?
    };

    io::stdout().write_all(&output)?;
    Ok(())
}
