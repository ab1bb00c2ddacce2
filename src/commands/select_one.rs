//! `linktree select-one` command.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::linker::add_symlink;
use crate::resolve::{ensure_output_absent, select_one};

/// Execute the `select-one` command.
///
/// Links `output` to the single path chosen from `inputs`, creating missing
/// parent directories of `output`.
///
/// # Errors
///
/// Returns an error if `output` exists, an input is missing, the selection
/// does not yield exactly one path, or linking fails.
pub fn run(ctx: &ServiceContext, inputs: &[PathBuf], filter: Option<&str>, output: &Path) -> Result<()> {
    let output = ctx.resolve(output);
    ensure_output_absent(ctx, &output)?;

    let selected = select_one(ctx, inputs, filter)?;
    if let Some(parent) = output.parent() {
        ctx.fs.create_dir_all(parent)?;
    }
    add_symlink(ctx, &selected, &output)?;

    info!(output = %output.display(), target = %selected.display(), "successfully output new sym link");
    Ok(())
}
