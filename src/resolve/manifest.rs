//! Manifest mode: logical paths from module manifests become link keys.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};
use crate::manifest::{load_manifest, ManifestEntry};
use crate::mapping::ResolvedMapping;

/// How a logical path is turned into a relative filesystem path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogicalPathStyle {
    /// The logical path is already slash-separated (`pkg/mod.lua`).
    #[default]
    Slash,
    /// Dots separate segments (`pkg.mod` becomes `pkg/mod`).
    Dotted,
}

impl LogicalPathStyle {
    /// Converts `logical_path` to a relative path in this style.
    ///
    /// # Errors
    ///
    /// Returns [`LinktreeError::InvalidLogicalPath`] if the result would be
    /// empty, absolute, climb out with `..`, or name the output root itself.
    pub fn to_relative(self, logical_path: &str) -> Result<PathBuf> {
        let relative: PathBuf = match self {
            Self::Slash => PathBuf::from(logical_path),
            Self::Dotted => logical_path.split('.').collect(),
        };
        if !stays_below_root(&relative) {
            return Err(LinktreeError::InvalidLogicalPath { logical_path: logical_path.to_string() });
        }
        Ok(relative)
    }
}

/// Returns `true` if joining `relative` onto a directory names something
/// strictly inside it.
fn stays_below_root(relative: &Path) -> bool {
    let mut named = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    named
}

/// Settings for manifest resolution.
#[derive(Debug, Clone, Default)]
pub struct ManifestOptions {
    /// Logical paths to drop silently.
    pub skip: HashSet<String>,
    /// Optional namespace segment prefixed to every link key.
    pub namespace: Option<String>,
    /// Logical path convention.
    pub style: LogicalPathStyle,
}

/// A manifest entry that survived skip-filtering, with paths resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// The entry's logical path, as written in the manifest.
    pub logical_path: String,
    /// Link key under the output root (namespace included).
    pub key: PathBuf,
    /// Absolute path of the physical file.
    pub source_file: PathBuf,
    /// Build target that produced the entry.
    pub build_target_id: String,
    /// Absolute original source path, if the manifest gave one.
    pub origin_source_path: Option<PathBuf>,
}

/// Output of manifest resolution.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolution {
    /// Links to create.
    pub mapping: ResolvedMapping,
    /// One record per link, in the same order.
    pub modules: Vec<ModuleRecord>,
}

/// Accumulates manifests in caller order into one mapping.
pub struct ManifestResolver<'a> {
    ctx: &'a ServiceContext,
    options: ManifestOptions,
    resolution: ManifestResolution,
}

impl<'a> ManifestResolver<'a> {
    /// Creates a resolver.
    ///
    /// # Errors
    ///
    /// Returns [`LinktreeError::InvalidNamespace`] if the namespace ends with
    /// a path separator or does not name a directory inside the output tree.
    pub fn new(ctx: &'a ServiceContext, options: ManifestOptions) -> Result<Self> {
        if let Some(namespace) = &options.namespace {
            let trailing = namespace.ends_with('/') || namespace.ends_with('\\');
            if trailing || !stays_below_root(Path::new(namespace)) {
                return Err(LinktreeError::InvalidNamespace { namespace: namespace.clone() });
            }
        }
        Ok(Self { ctx, options, resolution: ManifestResolution::default() })
    }

    /// Prefixes `relative` with the namespace, if any.
    #[must_use]
    pub fn namespaced(&self, relative: &Path) -> PathBuf {
        match &self.options.namespace {
            Some(namespace) => Path::new(namespace).join(relative),
            None => relative.to_path_buf(),
        }
    }

    /// Loads the manifest at `path` (relative to the root) and adds its entries.
    ///
    /// # Errors
    ///
    /// Propagates load errors and any error from [`Self::add_entries`].
    pub fn add_manifest(&mut self, path: &Path) -> Result<()> {
        let path = self.ctx.resolve(path);
        let entries = load_manifest(self.ctx, &path)?;
        self.add_entries(&path, entries)
    }

    /// Adds entries read from `manifest`, in record order.
    ///
    /// # Errors
    ///
    /// Returns [`LinktreeError::DuplicateKey`] when an entry's link key was
    /// already claimed, or [`LinktreeError::InvalidLogicalPath`].
    pub fn add_entries(&mut self, manifest: &Path, entries: Vec<ManifestEntry>) -> Result<()> {
        for entry in entries {
            if self.options.skip.contains(&entry.logical_path) {
                debug!(logical_path = %entry.logical_path, "skipping path");
                continue;
            }

            let key = self.namespaced(&self.options.style.to_relative(&entry.logical_path)?);
            let source_file = self.ctx.resolve(&entry.source_file);
            let origin = format!("{} ({})", entry.logical_path, manifest.display());
            self.resolution.mapping.insert(key.clone(), source_file.clone(), origin)?;

            self.resolution.modules.push(ModuleRecord {
                origin_source_path: entry.origin_source_path.as_deref().map(|p| self.ctx.resolve(p)),
                logical_path: entry.logical_path,
                key,
                source_file,
                build_target_id: entry.build_target_id,
            });
        }
        Ok(())
    }

    /// Returns everything resolved so far.
    #[must_use]
    pub fn finish(self) -> ManifestResolution {
        self.resolution
    }
}
