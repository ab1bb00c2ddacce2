//! Entry resolution: turns manifests or matched paths into a [`ResolvedMapping`].
//!
//! Every mode shares one rule: no two entries may claim the same link key.
//! A second claim is an error naming both sources, never an overlay.

pub mod manifest;
pub mod select;

pub use manifest::{LogicalPathStyle, ManifestOptions, ManifestResolution, ManifestResolver, ModuleRecord};
pub use select::{select_many, select_one};

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};

/// Resolves each input against the invocation root and checks it exists.
///
/// # Errors
///
/// Returns [`LinktreeError::MissingInput`] for the first input that does not exist.
pub fn validate_inputs(ctx: &ServiceContext, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    inputs
        .iter()
        .map(|input| {
            let path = ctx.resolve(input);
            if ctx.fs.exists(&path) {
                Ok(path)
            } else {
                Err(LinktreeError::MissingInput { path })
            }
        })
        .collect()
}

/// Checks that nothing, not even a dangling symlink, occupies `output`.
///
/// # Errors
///
/// Returns [`LinktreeError::OutputExists`] if the path is occupied, or an
/// I/O error if it cannot be probed.
pub fn ensure_output_absent(ctx: &ServiceContext, output: &Path) -> Result<()> {
    if ctx.fs.probe(output)?.is_occupied() {
        return Err(LinktreeError::OutputExists { path: output.to_path_buf() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{make_test_context, MemFs};

    #[test]
    fn validate_inputs_resolves_against_root() {
        let ctx = make_test_context("/repo", MemFs::with_dirs(&["/repo", "/repo/lib"]));
        let paths = validate_inputs(&ctx, &[PathBuf::from("lib")]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/repo/lib")]);

        let err = validate_inputs(&ctx, &[PathBuf::from("lib"), PathBuf::from("gone")]).unwrap_err();
        assert!(err.to_string().contains("/repo/gone"));
    }

    #[test]
    fn ensure_output_absent_rejects_existing_paths() {
        let ctx = make_test_context("/repo", MemFs::with_dirs(&["/repo", "/repo/out"]));
        assert!(ensure_output_absent(&ctx, Path::new("/repo/fresh")).is_ok());
        assert!(matches!(
            ensure_output_absent(&ctx, Path::new("/repo/out")),
            Err(LinktreeError::OutputExists { .. })
        ));
    }
}
