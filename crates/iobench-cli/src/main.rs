use clap::error::ErrorKind;
use clap::Parser;
use iobench_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("iobench warning: {:#}", err);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => err.exit(),
        Err(err) => {
            // Usage errors go to stderr with exit code 1.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    if let Err(err) = cli.run() {
        eprintln!("iobench error: {:#}", err);
        std::process::exit(1);
    }
}
