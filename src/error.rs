//! Error taxonomy shared by every stage of linktree materialization.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`LinktreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input is missing or an output already exists.
    InputValidation,
    /// Two entries claim the same key, or a match-count invariant failed.
    ResolutionConflict,
    /// A link would be placed over an existing filesystem entry.
    LinkCollision,
    /// A relative path does not begin with the required strip-prefix.
    PrefixMismatch,
    /// Any other filesystem failure.
    Io,
}

/// Errors produced while resolving or materializing a linktree.
#[derive(Debug, Error)]
pub enum LinktreeError {
    /// An input path does not exist.
    #[error("Input path '{}' does not exist", path.display())]
    MissingInput {
        /// The missing path.
        path: PathBuf,
    },

    /// The output path exists before the invocation started.
    #[error("Output path '{}' already exists", path.display())]
    OutputExists {
        /// The pre-existing output path.
        path: PathBuf,
    },

    /// The namespace ends with a path separator or escapes the output tree.
    #[error("Namespace '{namespace}' must be a relative directory inside the output tree without a trailing separator")]
    InvalidNamespace {
        /// The rejected namespace.
        namespace: String,
    },

    /// A logical path would escape the output tree or name its root.
    #[error("Logical path '{logical_path}' must be relative, must not contain '..' and must name an entry")]
    InvalidLogicalPath {
        /// The rejected logical path.
        logical_path: String,
    },

    /// A filter pattern could not be compiled.
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A manifest file could not be parsed.
    #[error("Failed to parse manifest '{}': {reason}", path.display())]
    MalformedManifest {
        /// The manifest file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Two entries resolved to the same link key.
    #[error("Duplicate link key '{key}': claimed by '{first}' and '{second}'")]
    DuplicateKey {
        /// The contested key.
        key: String,
        /// Source of the first claim.
        first: String,
        /// Source of the second claim.
        second: String,
    },

    /// One key would place a link inside the directory another key links.
    #[error("Link key '{key}' ({origin}) lies below '{parent}' ({parent_origin}), which is itself a link")]
    NestedKey {
        /// The key below the other.
        key: String,
        /// Source of `key`.
        origin: String,
        /// The enclosing key.
        parent: String,
        /// Source of `parent`.
        parent_origin: String,
    },

    /// No filter was given but more than one input path was.
    #[error("Expected exactly one input path when no filter is specified, got {count}")]
    AmbiguousInput {
        /// Number of input paths supplied.
        count: usize,
    },

    /// A filter did not produce exactly one match.
    #[error("Found {count} matches but expected one for filter '{filter}'")]
    MatchCount {
        /// Number of matches found.
        count: usize,
        /// The filter that was applied.
        filter: String,
    },

    /// An existing symlink points somewhere else.
    #[error(
        "{} already exists, and is linked to {}. Cannot link to {}",
        link.display(),
        existing.display(),
        requested.display()
    )]
    LinkTargetConflict {
        /// Where the link was to be created.
        link: PathBuf,
        /// Target of the existing link.
        existing: PathBuf,
        /// Target that was requested.
        requested: PathBuf,
    },

    /// A non-link entity occupies the link path.
    #[error("{} already exists. Cannot link to {}", link.display(), requested.display())]
    LinkOccupied {
        /// Where the link was to be created.
        link: PathBuf,
        /// Target that was requested.
        requested: PathBuf,
    },

    /// A relative path does not start with the strip-prefix, or stripping
    /// left an empty or rooted path.
    #[error("Relative path '{path}' cannot be stripped of prefix '{prefix}'")]
    PrefixMismatch {
        /// The offending relative path.
        path: String,
        /// The required prefix.
        prefix: String,
    },

    /// Underlying filesystem failure, unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LinktreeError {
    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput { .. }
            | Self::OutputExists { .. }
            | Self::InvalidNamespace { .. }
            | Self::InvalidLogicalPath { .. }
            | Self::InvalidPattern { .. }
            | Self::MalformedManifest { .. } => ErrorKind::InputValidation,
            Self::DuplicateKey { .. }
            | Self::NestedKey { .. }
            | Self::AmbiguousInput { .. }
            | Self::MatchCount { .. } => ErrorKind::ResolutionConflict,
            Self::LinkTargetConflict { .. } | Self::LinkOccupied { .. } => {
                ErrorKind::LinkCollision
            }
            Self::PrefixMismatch { .. } => ErrorKind::PrefixMismatch,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinktreeError>;
