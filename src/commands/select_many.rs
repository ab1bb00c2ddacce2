//! `linktree select-many` command.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::linker::materialize;
use crate::resolve::{ensure_output_absent, select_many};

/// Execute the `select-many` command.
///
/// Mirrors every filtered path into a new `output` directory, keyed by
/// relative path with `strip_prefix` removed.
///
/// # Errors
///
/// Returns an error if `output` exists, an input is missing, keys collide or
/// do not carry the prefix, or linking fails.
pub fn run(
    ctx: &ServiceContext,
    inputs: &[PathBuf],
    filter: &str,
    strip_prefix: &str,
    output: &Path,
) -> Result<()> {
    let output = ctx.resolve(output);
    ensure_output_absent(ctx, &output)?;

    let mapping = select_many(ctx, inputs, filter, strip_prefix)?;
    ctx.fs.create_dir(&output)?;
    let links = materialize(ctx, &output, &mapping)?;

    info!(links = links.len(), output = %output.display(), "successfully output new sym links");
    Ok(())
}
