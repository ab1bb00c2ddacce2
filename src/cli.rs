//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::resolve::LogicalPathStyle;

/// Top-level CLI parser for `linktree`.
#[derive(Debug, Parser)]
#[command(name = "linktree", version, about = "Materialize module namespaces as symlink trees")]
pub struct Cli {
    /// Invocation root for relative paths. Defaults to `LINKTREE_ROOT`, then
    /// the current directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Link every manifest entry into a new output directory.
    BuildLinktree {
        /// Output directory; must not exist, its parent must.
        output_dir: PathBuf,
        /// Module manifests to link, in order.
        #[arg(short = 'm', long = "module-manifest", num_args = 1.., required = true)]
        manifests: Vec<PathBuf>,
        /// Logical paths to leave out.
        #[arg(short = 'i', long = "skip-paths", num_args = 1..)]
        skip_paths: Vec<String>,
        /// Namespace directory prefixed to every link.
        #[arg(long)]
        namespace: Option<String>,
        /// Also write the runtime build-info module.
        #[arg(long)]
        create_runtime_build_info_loader: bool,
        /// How logical paths map onto directories.
        #[arg(long, value_enum, default_value_t = LogicalPathStyle::Slash)]
        logical_path_style: LogicalPathStyle,
    },
    /// Link the single path selected by an optional filter.
    SelectOne {
        /// Input files or directories.
        #[arg(long = "input-path", num_args = 1.., required = true)]
        input_paths: Vec<PathBuf>,
        /// Glob filter applied to inputs and their descendants.
        #[arg(long)]
        filter: Option<String>,
        /// Link to create; must not exist.
        #[arg(long)]
        output: PathBuf,
    },
    /// Mirror every filtered path into a new output directory.
    SelectMany {
        /// Input files or directories.
        #[arg(long = "input-path", num_args = 1.., required = true)]
        input_paths: Vec<PathBuf>,
        /// Glob filter applied to inputs and their descendants.
        #[arg(long)]
        filter: String,
        /// Prefix removed from every relative path.
        #[arg(long)]
        strip_prefix: String,
        /// Output directory; must not exist, its parent must.
        #[arg(long)]
        output: PathBuf,
    },
}
