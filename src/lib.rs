//! Core library entry for the `linktree` CLI.
//!
//! Materializes a logical module namespace as a directory of symbolic links
//! so an interpreter can load modules scattered across a source tree.

pub mod adapters;
pub mod build_info;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod linker;
pub mod manifest;
pub mod mapping;
pub mod matcher;
pub mod ports;
pub mod resolve;

pub use error::{ErrorKind, LinktreeError};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(cli.root.as_deref(), &cli.command)
}
