//! Command dispatch and handlers.

pub mod build_linktree;
pub mod select_many;
pub mod select_one;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::error::Result;

/// Environment variable consulted for the invocation root when `--root` is absent.
pub const ROOT_ENV: &str = "LINKTREE_ROOT";

/// Environment variable that pins the build timestamp.
pub const SOURCE_DATE_EPOCH_ENV: &str = "SOURCE_DATE_EPOCH";

/// Dispatch a parsed command to its handler.
///
/// The invocation root is `root` if given, else `LINKTREE_ROOT`, else the
/// current directory.
///
/// # Errors
///
/// Returns an error string if the root cannot be determined or the selected
/// command handler fails.
pub fn dispatch(root: Option<&Path>, command: &Command) -> std::result::Result<(), String> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => match env::var_os(ROOT_ENV) {
            Some(root) => PathBuf::from(root),
            None => env::current_dir().map_err(|e| format!("failed to get current directory: {e}"))?,
        },
    };
    let epoch = env::var(SOURCE_DATE_EPOCH_ENV).ok();
    let ctx = ServiceContext::live(&root, epoch.as_deref());

    dispatch_with_context(command, &ctx).map_err(|e| e.to_string())
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns whatever the selected handler returns.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<()> {
    match command {
        Command::BuildLinktree {
            output_dir,
            manifests,
            skip_paths,
            namespace,
            create_runtime_build_info_loader,
            logical_path_style,
        } => build_linktree::run(
            ctx,
            &build_linktree::BuildLinktreeArgs {
                manifests: manifests.clone(),
                skip_paths: skip_paths.clone(),
                namespace: namespace.clone(),
                output_dir: output_dir.clone(),
                create_build_info: *create_runtime_build_info_loader,
                style: *logical_path_style,
            },
        ),
        Command::SelectOne { input_paths, filter, output } => {
            select_one::run(ctx, input_paths, filter.as_deref(), output)
        }
        Command::SelectMany { input_paths, filter, strip_prefix, output } => {
            select_many::run(ctx, input_paths, filter, strip_prefix, output)
        }
    }
}
