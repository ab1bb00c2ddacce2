//! Conflict-safe link builder.
//!
//! Links are never created over an existing entry. There is no rollback:
//! callers own a freshly created output directory, so cleaning up after a
//! failure means removing that one directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{LinktreeError, Result};
use crate::mapping::ResolvedMapping;
use crate::ports::filesystem::PathState;

/// Creates `output_root/key -> target` for every mapping entry, in order.
///
/// Returns the absolute link paths that were created.
///
/// # Errors
///
/// Returns a link-collision error if anything already occupies a link path
/// or a symlink sits between `output_root` and it, or the underlying I/O
/// error for any other failure.
pub fn materialize(ctx: &ServiceContext, output_root: &Path, mapping: &ResolvedMapping) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(mapping.len());
    for entry in mapping.iter() {
        ensure_no_linked_parent(ctx, output_root, &entry.key, &entry.target)?;
        let link = output_root.join(&entry.key);
        if let Some(parent) = link.parent() {
            ctx.fs.create_dir_all(parent)?;
        }
        add_symlink(ctx, &entry.target, &link)?;
        created.push(link);
    }
    Ok(created)
}

/// Fails if any directory between `output_root` and `key` is a symlink, so
/// nothing is ever created outside the output tree.
fn ensure_no_linked_parent(ctx: &ServiceContext, output_root: &Path, key: &Path, target: &Path) -> Result<()> {
    let mut dir = output_root.to_path_buf();
    for component in key.parent().into_iter().flat_map(Path::components) {
        dir.push(component);
        if let PathState::Link { target: existing } = ctx.fs.probe(&dir)? {
            return Err(LinktreeError::LinkTargetConflict {
                link: dir,
                existing,
                requested: target.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Creates one symlink at `link` pointing at `target`.
///
/// # Errors
///
/// Returns [`LinktreeError::LinkTargetConflict`] if a symlink is already
/// there, [`LinktreeError::LinkOccupied`] if a non-link entity is, or the
/// I/O error otherwise.
pub fn add_symlink(ctx: &ServiceContext, target: &Path, link: &Path) -> Result<()> {
    debug!(link = %link.display(), target = %target.display(), "creating sym link");

    let Err(err) = ctx.fs.symlink(target, link) else {
        return Ok(());
    };
    match occupied_error(ctx, target, link)? {
        Some(collision) => Err(collision),
        None => Err(LinktreeError::Io(err)),
    }
}

/// Describes what blocks `link`, or `None` if nothing does.
fn occupied_error(ctx: &ServiceContext, target: &Path, link: &Path) -> io::Result<Option<LinktreeError>> {
    Ok(match ctx.fs.probe(link)? {
        PathState::Absent => None,
        PathState::Link { target: existing } => Some(LinktreeError::LinkTargetConflict {
            link: link.to_path_buf(),
            existing,
            requested: target.to_path_buf(),
        }),
        PathState::Entity => {
            Some(LinktreeError::LinkOccupied { link: link.to_path_buf(), requested: target.to_path_buf() })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::{make_test_context, MemFs, Node};
    use crate::error::ErrorKind;

    fn mapping(pairs: &[(&str, &str)]) -> ResolvedMapping {
        let mut mapping = ResolvedMapping::new();
        for (key, target) in pairs {
            mapping.insert(PathBuf::from(key), PathBuf::from(target), *key).unwrap();
        }
        mapping
    }

    #[test]
    fn creates_parents_and_links() {
        let fs = MemFs::with_dirs(&["/out"]);
        let ctx = make_test_context("/repo", fs.clone());

        let created = materialize(
            &ctx,
            Path::new("/out"),
            &mapping(&[("pkg/a.lua", "/repo/src/a.lua"), ("b.lua", "/repo/src/b.lua")]),
        )
        .unwrap();

        assert_eq!(created, vec![PathBuf::from("/out/pkg/a.lua"), PathBuf::from("/out/b.lua")]);
        assert_eq!(fs.node("/out/pkg"), Some(Node::Dir));
        assert_eq!(fs.node("/out/pkg/a.lua"), Some(Node::Link(PathBuf::from("/repo/src/a.lua"))));
    }

    #[test]
    fn existing_link_reports_both_targets() {
        let fs = MemFs::with_dirs(&["/out"]);
        fs.nodes.lock().unwrap().insert(PathBuf::from("/out/a.lua"), Node::Link("/old/a.lua".into()));
        let ctx = make_test_context("/repo", fs);

        let err = materialize(&ctx, Path::new("/out"), &mapping(&[("a.lua", "/new/a.lua")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LinkCollision);
        let msg = err.to_string();
        assert!(msg.contains("/old/a.lua"));
        assert!(msg.contains("/new/a.lua"));
    }

    #[test]
    fn existing_entity_is_reported_as_occupied() {
        let fs = MemFs::with_dirs(&["/out", "/out/a.lua"]);
        let ctx = make_test_context("/repo", fs);

        let err = materialize(&ctx, Path::new("/out"), &mapping(&[("a.lua", "/src/a.lua")])).unwrap_err();
        assert!(matches!(err, LinktreeError::LinkOccupied { .. }));
    }

    #[test]
    fn stops_at_first_failure_without_rollback() {
        let fs = MemFs::with_dirs(&["/out", "/out/b.lua"]);
        let ctx = make_test_context("/repo", fs.clone());

        let result = materialize(
            &ctx,
            Path::new("/out"),
            &mapping(&[("a.lua", "/src/a.lua"), ("b.lua", "/src/b.lua"), ("c.lua", "/src/c.lua")]),
        );

        assert!(result.is_err());
        assert!(fs.node("/out/a.lua").is_some());
        assert!(fs.node("/out/c.lua").is_none());
    }

    #[test]
    fn never_writes_through_a_linked_directory() {
        let fs = MemFs::with_dirs(&["/out", "/repo/srcdir"]);
        fs.nodes.lock().unwrap().insert(PathBuf::from("/out/a"), Node::Link("/repo/srcdir".into()));
        let ctx = make_test_context("/repo", fs.clone());

        let err = materialize(&ctx, Path::new("/out"), &mapping(&[("a/b.lua", "/repo/src/b.lua")])).unwrap_err();
        match err {
            LinktreeError::LinkTargetConflict { link, existing, .. } => {
                assert_eq!(link, PathBuf::from("/out/a"));
                assert_eq!(existing, PathBuf::from("/repo/srcdir"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fs.node("/repo/srcdir/b.lua").is_none());
        assert!(fs.node("/out/a/b.lua").is_none());
    }

    #[test]
    fn other_symlink_failures_pass_through() {
        // No parent directory: the link fails with NotFound and nothing occupies it.
        let ctx = make_test_context("/repo", MemFs::with_dirs(&["/out"]));

        let err = add_symlink(&ctx, Path::new("/src/a.lua"), Path::new("/missing/a.lua")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        let LinktreeError::Io(source) = err else {
            panic!("expected an I/O error");
        };
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn linked_key_directory_stays_untouched_on_disk() {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;

        let dir = tempfile::TempDir::new().unwrap();
        let srcdir = dir.path().join("srcdir");
        std::fs::create_dir_all(&srcdir).unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::os::unix::fs::symlink(&srcdir, out.join("a")).unwrap();
        let ctx = ServiceContext {
            root: dir.path().to_path_buf(),
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
        };

        let result = materialize(&ctx, &out, &mapping(&[("a/b.lua", "/src/b.lua")]));
        assert!(matches!(result, Err(LinktreeError::LinkTargetConflict { .. })));
        assert_eq!(std::fs::read_dir(&srcdir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_still_counts_as_a_collision() {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;

        let dir = tempfile::TempDir::new().unwrap();
        std::os::unix::fs::symlink("/does/not/exist", dir.path().join("a.lua")).unwrap();
        let ctx = ServiceContext {
            root: dir.path().to_path_buf(),
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
        };

        let err = add_symlink(&ctx, Path::new("/src/a.lua"), &dir.path().join("a.lua")).unwrap_err();
        match err {
            LinktreeError::LinkTargetConflict { existing, .. } => {
                assert_eq!(existing, PathBuf::from("/does/not/exist"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
