//! Filesystem port for the mutations a linktree needs.

use std::io;
use std::path::{Path, PathBuf};

/// What currently occupies a path, without following a final symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    /// Nothing is at this path.
    Absent,
    /// A symbolic link, broken or not, pointing at `target`.
    Link {
        /// The link's stored target.
        target: PathBuf,
    },
    /// A file, directory, or other non-link entity.
    Entity,
}

impl PathState {
    /// Returns `true` unless the path is [`PathState::Absent`].
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Provides filesystem access for building a linktree.
///
/// Every method reports failures as plain [`io::Error`] so callers can
/// propagate them unchanged.
pub trait FileSystem: Send + Sync {
    /// Reports what occupies `path`. Dangling symlinks are reported as links.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn probe(&self, path: &Path) -> io::Result<PathState>;

    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists every descendant of `root` in pre-order, siblings sorted by
    /// name. Symlinked directories are listed but not entered, and `root`
    /// itself is left out.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be read.
    fn walk(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Creates a single directory. Fails if it exists or its parent is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Creates a directory and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Creates a symbolic link at `link` pointing at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if anything already exists at `link` or the link
    /// cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Writes `contents` to a file that must not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is occupied or the write fails.
    fn write_new(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
