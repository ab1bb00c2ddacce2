//! Service context bundling the invocation root and port trait objects.

use std::path::{Path, PathBuf};

use crate::adapters::live::clock::{FixedClock, LiveClock};
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Everything one invocation needs from the outside world.
///
/// Relative paths in manifests and on the command line resolve against
/// `root`; all I/O goes through `fs` and all time queries through `clock`.
pub struct ServiceContext {
    /// Invocation root that relative paths are resolved against.
    pub root: PathBuf,
    /// Clock for the build timestamp.
    pub clock: Box<dyn Clock>,
    /// Filesystem for probes and mutations.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context with real adapters rooted at `root`.
    ///
    /// When `source_date_epoch` holds a valid epoch value the clock is pinned
    /// to it, otherwise the system clock is used.
    #[must_use]
    pub fn live(root: &Path, source_date_epoch: Option<&str>) -> Self {
        let clock: Box<dyn Clock> = match source_date_epoch.and_then(FixedClock::from_epoch_str) {
            Some(fixed) => Box::new(fixed),
            None => Box::new(LiveClock),
        };
        Self { root: root.to_path_buf(), clock, fs: Box::new(LiveFileSystem) }
    }

    /// Resolves `path` against the invocation root. Absolute paths pass through.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}
