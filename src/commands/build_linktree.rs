//! `linktree build-linktree` command.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::build_info::{render, BuildInfoEntry, BUILD_INFO_FILE};
use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};
use crate::linker::materialize;
use crate::resolve::{ensure_output_absent, LogicalPathStyle, ManifestOptions, ManifestResolver};

/// Inputs for one linktree build.
#[derive(Debug, Clone, Default)]
pub struct BuildLinktreeArgs {
    /// Manifests, relative to the invocation root, in processing order.
    pub manifests: Vec<PathBuf>,
    /// Logical paths to drop.
    pub skip_paths: Vec<String>,
    /// Optional namespace directory.
    pub namespace: Option<String>,
    /// Output directory; must not exist.
    pub output_dir: PathBuf,
    /// Whether to write the runtime build-info module.
    pub create_build_info: bool,
    /// Logical path convention.
    pub style: LogicalPathStyle,
}

/// Execute the `build-linktree` command.
///
/// Every manifest is resolved before anything is written, so resolution
/// failures leave no output directory behind.
///
/// # Errors
///
/// Returns an error if the output exists, a manifest is missing or
/// malformed, two entries collide, or linking fails.
pub fn run(ctx: &ServiceContext, args: &BuildLinktreeArgs) -> Result<()> {
    let output = ctx.resolve(&args.output_dir);
    ensure_output_absent(ctx, &output)?;

    let options = ManifestOptions {
        skip: args.skip_paths.iter().cloned().collect::<HashSet<_>>(),
        namespace: args.namespace.clone(),
        style: args.style,
    };
    let mut resolver = ManifestResolver::new(ctx, options)?;
    for manifest in &args.manifests {
        debug!(manifest = %manifest.display(), "reading manifest");
        resolver.add_manifest(manifest)?;
    }
    let build_info_key = resolver.namespaced(Path::new(BUILD_INFO_FILE));
    let resolution = resolver.finish();

    if args.create_build_info {
        if let Some(claimed) = resolution.mapping.iter().find(|e| e.key == build_info_key) {
            return Err(LinktreeError::DuplicateKey {
                key: build_info_key.display().to_string(),
                first: claimed.origin.clone(),
                second: "generated build info module".to_string(),
            });
        }
    }

    ctx.fs.create_dir(&output)?;
    let links = materialize(ctx, &output, &resolution.mapping)?;

    if args.create_build_info {
        let entries: Vec<BuildInfoEntry<'_>> = resolution
            .modules
            .iter()
            .zip(&links)
            .map(|(module, link)| BuildInfoEntry {
                logical_path: &module.logical_path,
                link_path: link,
                source: module.origin_source_path.as_deref(),
            })
            .collect();
        let build_info_path = output.join(&build_info_key);
        if let Some(parent) = build_info_path.parent() {
            ctx.fs.create_dir_all(parent)?;
        }
        ctx.fs.write_new(&build_info_path, &render(&entries, ctx.clock.now()))?;
        debug!(path = %build_info_path.display(), "wrote build info module");
    }

    info!(links = links.len(), output = %output.display(), "completed successfully");
    Ok(())
}
