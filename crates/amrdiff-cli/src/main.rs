mod cli;
mod cmd;
mod error;
mod io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, OutputFormat, PathOrStdin};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        tracing::debug!(exit_code = e.exit_code(), "command failed");
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` overrides the level picked from `--quiet`/`--verbose`.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Diff {
            bundle,
            root_marker,
        } => {
            let content = io::read_input(bundle, cli.max_file_size)?;
            let decoded: cmd::diff::Bundle = io::parse_json(&content, &bundle.label())?;
            cmd::diff::run(decoded, root_marker, cli.format, cli.verbose)
        }
        Command::Tables { gold } => {
            let content = io::read_input(gold, cli.max_file_size)?;
            let decoded = io::parse_json(&content, &gold.label())?;
            cmd::tables::run(&decoded, cli.format)
        }
    }
}
