/// Command modules for the `amrdiff` CLI.
///
/// Each submodule implements one subcommand. Its `run` function takes the
/// decoded input and returns `Ok(())` on success or a
/// [`crate::error::CliError`] on failure.
pub mod diff;
pub mod tables;
