//! Select modes: filter input paths by glob and collect the matches.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};
use crate::mapping::ResolvedMapping;
use crate::matcher::{expand, Pattern};

/// Picks exactly one path from `inputs`.
///
/// With no `filter` there must be exactly one input and it is the match.
/// With a filter, each input that matches is taken as-is, and each input
/// directory contributes every matching descendant.
///
/// # Errors
///
/// Returns [`LinktreeError::MissingInput`] for a missing input,
/// [`LinktreeError::AmbiguousInput`] when no filter is given alongside several
/// inputs, and [`LinktreeError::MatchCount`] when the filter does not yield
/// exactly one match.
pub fn select_one(ctx: &ServiceContext, inputs: &[PathBuf], filter: Option<&str>) -> Result<PathBuf> {
    let inputs = super::validate_inputs(ctx, inputs)?;

    let Some(filter) = filter else {
        return match <[PathBuf; 1]>::try_from(inputs) {
            Ok([only]) => Ok(only),
            Err(inputs) => Err(LinktreeError::AmbiguousInput { count: inputs.len() }),
        };
    };

    let pattern = Pattern::new(filter)?;
    let mut matches = Vec::new();
    for input in &inputs {
        debug!(input = %input.display(), "processing input path");
        if pattern.matches(input) {
            matches.push(input.clone());
            continue;
        }
        if ctx.fs.is_dir(input) {
            matches.extend(expand(ctx.fs.as_ref(), input, &pattern)?);
        }
    }

    match <[PathBuf; 1]>::try_from(matches) {
        Ok([only]) => Ok(only),
        Err(matches) => {
            Err(LinktreeError::MatchCount { count: matches.len(), filter: filter.to_string() })
        }
    }
}

/// Collects every match under `inputs` into a mapping keyed by relative path
/// with `strip_prefix` removed.
///
/// An input that matches directly is keyed by its file name; matches below an
/// input directory are keyed by their path relative to that input.
///
/// # Errors
///
/// Returns [`LinktreeError::MissingInput`] for a missing input,
/// [`LinktreeError::DuplicateKey`] if two matches share a relative path,
/// [`LinktreeError::NestedKey`] if one lies below another match, and
/// [`LinktreeError::PrefixMismatch`] if a relative path does not start with
/// `strip_prefix` or stripping leaves an empty or rooted path.
pub fn select_many(
    ctx: &ServiceContext,
    inputs: &[PathBuf],
    filter: &str,
    strip_prefix: &str,
) -> Result<ResolvedMapping> {
    let inputs = super::validate_inputs(ctx, inputs)?;
    let pattern = Pattern::new(filter)?;
    let mut mapping = ResolvedMapping::new();

    for input in &inputs {
        debug!(input = %input.display(), "processing input path");
        if pattern.matches(input) {
            let name = Path::new(input.file_name().unwrap_or_default());
            let key = strip(name, strip_prefix)?;
            mapping.insert(key, input.clone(), input.display().to_string())?;
            continue;
        }
        if ctx.fs.is_dir(input) {
            for found in expand(ctx.fs.as_ref(), input, &pattern)? {
                let relative = found.strip_prefix(input).unwrap_or(&found);
                let key = strip(relative, strip_prefix)?;
                mapping.insert(key, found.clone(), found.display().to_string())?;
            }
        }
    }

    Ok(mapping)
}

fn strip(relative: &Path, prefix: &str) -> Result<PathBuf> {
    let mismatch = || LinktreeError::PrefixMismatch {
        path: relative.display().to_string(),
        prefix: prefix.to_string(),
    };
    let rest = strip_text_prefix(relative.as_os_str(), prefix).ok_or_else(mismatch)?;
    match rest.as_encoded_bytes().first() {
        None | Some(b'/' | b'\\') => Err(mismatch()),
        Some(_) => Ok(PathBuf::from(rest)),
    }
}

#[cfg(unix)]
fn strip_text_prefix<'a>(value: &'a OsStr, prefix: &str) -> Option<&'a OsStr> {
    use std::os::unix::ffi::OsStrExt;

    value.as_bytes().strip_prefix(prefix.as_bytes()).map(OsStr::from_bytes)
}

#[cfg(not(unix))]
fn strip_text_prefix<'a>(value: &'a OsStr, prefix: &str) -> Option<&'a OsStr> {
    value.to_str()?.strip_prefix(prefix).map(OsStr::new)
}
