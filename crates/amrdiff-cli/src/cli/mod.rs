//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use amrdiff_core::DEFAULT_ROOT_MARKER;
use clap::{Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in error messages: `"-"` for stdin, otherwise the path.
    pub fn label(&self) -> String {
        match self {
            PathOrStdin::Stdin => "-".to_owned(),
            PathOrStdin::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Structured JSON (default).
    Json,
    /// Plain-text summary followed by every disagreeing element.
    Human,
}

/// All top-level subcommands exposed by the `amrdiff` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Build the annotated diff graph for a test/gold bundle.
    Diff {
        /// Path to a bundle JSON file, or `-` for stdin.
        ///
        /// The bundle holds `test` and `gold` triples, the `match` array and
        /// an optional `constant_map`. `gold_tables` from `amrdiff tables`
        /// may stand in for `gold`.
        #[arg(value_name = "BUNDLE")]
        bundle: PathOrStdin,
        /// Attribute relation drawn as a self-loop marking the graph root.
        #[arg(
            long,
            env = "AMRDIFF_ROOT_MARKER",
            default_value = DEFAULT_ROOT_MARKER
        )]
        root_marker: String,
    },

    /// Print the lookup tables built from a gold graph.
    Tables {
        /// Path to a gold triples JSON file, or `-` for stdin.
        #[arg(value_name = "GOLD")]
        gold: PathOrStdin,
    },
}

/// Root CLI struct for the `amrdiff` binary.
///
/// Global flags are marked `global = true` so that clap propagates them to
/// every subcommand.
#[derive(Parser)]
#[command(
    name = "amrdiff",
    version,
    about = "Annotated test/gold diff graphs for AMR-style semantic graphs",
    long_about = "Merges a test graph and a gold graph into one annotated multigraph\n\
                  given a node correspondence, marking every node and edge as\n\
                  agreeing, test-only or gold-only."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: json (default) or human.
    #[arg(long, short = 'f', default_value = "json", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log phase counts and timing to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `AMRDIFF_MAX_FILE_SIZE` environment variable.
    /// Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "AMRDIFF_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,
}
