//! Insertion-ordered, duplicate-rejecting link mapping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LinktreeError, Result};

/// One link to create: `key` under the output root pointing at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Relative path of the link under the output root.
    pub key: PathBuf,
    /// Absolute path the link points at.
    pub target: PathBuf,
    /// Human-readable description of where this entry came from.
    pub origin: String,
}

/// Link keys to targets, in the order they were resolved.
///
/// Keys compare by path components, so `a//b` and `a/b` collide. A key may
/// not lie below another key, since that link's directory would be written
/// through it.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMapping {
    entries: Vec<MappingEntry>,
    index: HashMap<PathBuf, usize>,
    // Every strict ancestor of a key, pointing at the first entry below it.
    parents: HashMap<PathBuf, usize>,
}

impl ResolvedMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link.
    ///
    /// # Errors
    ///
    /// Returns [`LinktreeError::DuplicateKey`] naming both origins if `key`
    /// is already present, or [`LinktreeError::NestedKey`] if `key` lies
    /// below an existing key or above one. The existing entries are kept.
    pub fn insert(&mut self, key: PathBuf, target: PathBuf, origin: impl Into<String>) -> Result<()> {
        let origin = origin.into();
        if let Some(&existing) = self.index.get(&key) {
            return Err(LinktreeError::DuplicateKey {
                key: key.display().to_string(),
                first: self.entries[existing].origin.clone(),
                second: origin,
            });
        }
        if let Some(&below) = self.parents.get(&key) {
            let below = &self.entries[below];
            return Err(LinktreeError::NestedKey {
                key: below.key.display().to_string(),
                origin: below.origin.clone(),
                parent: key.display().to_string(),
                parent_origin: origin,
            });
        }
        let ancestors: Vec<&Path> = key.ancestors().skip(1).filter(|a| a.file_name().is_some()).collect();
        if let Some(&above) = ancestors.iter().find_map(|a| self.index.get(*a)) {
            let above = &self.entries[above];
            return Err(LinktreeError::NestedKey {
                key: key.display().to_string(),
                origin,
                parent: above.key.display().to_string(),
                parent_origin: above.origin.clone(),
            });
        }

        for ancestor in ancestors {
            self.parents.entry(ancestor.to_path_buf()).or_insert(self.entries.len());
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(MappingEntry { key, target, origin });
        Ok(())
    }

    /// Looks up the target for `key`.
    #[must_use]
    pub fn get(&self, key: &Path) -> Option<&Path> {
        self.index.get(key).map(|&i| self.entries[i].target.as_path())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
