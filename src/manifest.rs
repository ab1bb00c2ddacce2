//! Manifest records and manifest file loading.
//!
//! A manifest is a list of positional records:
//!
//! ```text
//! [logical_path, source_file, build_target_id]
//! [logical_path, source_file, build_target_id, origin_source_path | null]
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};

/// One record of a module manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Namespace-relative identifier of the module.
    pub logical_path: String,
    /// Physical file, relative to the invocation root.
    pub source_file: String,
    /// Build target that produced the entry.
    pub build_target_id: String,
    /// Original source location, when the file was generated from one.
    pub origin_source_path: Option<String>,
}

impl<'de> Deserialize<'de> for ManifestEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_seq(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = ManifestEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a manifest record of 3 or 4 elements")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let logical_path: String =
            seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let source_file: String =
            seq.next_element()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let build_target_id: String =
            seq.next_element()?.ok_or_else(|| de::Error::invalid_length(2, &self))?;
        let origin_source_path = seq.next_element::<Option<String>>()?.flatten();
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(5, &self));
        }

        Ok(ManifestEntry { logical_path, source_file, build_target_id, origin_source_path })
    }
}

/// Parses manifest text. `yaml` selects YAML instead of JSON.
///
/// # Errors
///
/// Returns [`LinktreeError::MalformedManifest`] if the text is not a list of
/// 3 or 4 element records.
pub fn parse_manifest(path: &Path, contents: &str, yaml: bool) -> Result<Vec<ManifestEntry>> {
    let malformed = |reason: String| LinktreeError::MalformedManifest { path: path.to_path_buf(), reason };
    if yaml {
        serde_yaml::from_str(contents).map_err(|e| malformed(e.to_string()))
    } else {
        serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))
    }
}

/// Reads and parses the manifest at `path` (already resolved against the root).
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns [`LinktreeError::MissingInput`] if the file does not exist, an I/O
/// error if it cannot be read, or [`LinktreeError::MalformedManifest`].
pub fn load_manifest(ctx: &ServiceContext, path: &Path) -> Result<Vec<ManifestEntry>> {
    if !ctx.fs.exists(path) {
        return Err(LinktreeError::MissingInput { path: path.to_path_buf() });
    }
    let contents = ctx.fs.read_to_string(path)?;
    let yaml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    parse_manifest(path, &contents, yaml)
}
