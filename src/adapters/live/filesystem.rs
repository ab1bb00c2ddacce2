//! Live filesystem adapter using `std::fs`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ports::filesystem::{FileSystem, PathState};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn probe(&self, path: &Path) -> io::Result<PathState> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                Ok(PathState::Link { target: std::fs::read_link(path)? })
            }
            Ok(_) => Ok(PathState::Entity),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathState::Absent),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| entry.map(walkdir::DirEntry::into_path).map_err(io::Error::from))
            .collect()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    #[cfg(unix)]
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }

    fn write_new(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(contents.as_bytes())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn probe_distinguishes_three_states() {
        let dir = TempDir::new().unwrap();
        let fs = LiveFileSystem;
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let dangling = dir.path().join("dangling");
        fs.symlink(Path::new("/nonexistent/target"), &dangling).unwrap();

        assert_eq!(fs.probe(&dir.path().join("missing")).unwrap(), PathState::Absent);
        assert_eq!(fs.probe(&file).unwrap(), PathState::Entity);
        assert_eq!(
            fs.probe(&dangling).unwrap(),
            PathState::Link { target: PathBuf::from("/nonexistent/target") }
        );
        assert!(!fs.exists(&dangling));
    }

    #[test]
    fn write_new_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let fs = LiveFileSystem;
        let path = dir.path().join("out.lua");
        fs.write_new(&path, "first").unwrap();

        let err = fs.write_new(&path, "second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs.read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn walk_lists_linked_directories_without_entering_them() {
        let dir = TempDir::new().unwrap();
        let fs = LiveFileSystem;
        std::fs::create_dir_all(dir.path().join("real/inner")).unwrap();
        std::fs::write(dir.path().join("real/inner/m.lua"), "").unwrap();
        fs.symlink(&dir.path().join("real"), &dir.path().join("alias")).unwrap();

        let found: Vec<PathBuf> = fs
            .walk(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("alias"),
                PathBuf::from("real"),
                PathBuf::from("real/inner"),
                PathBuf::from("real/inner/m.lua"),
            ]
        );
        assert!(fs.is_dir(&dir.path().join("alias")));
        assert!(!fs.is_dir(&dir.path().join("real/inner/m.lua")));
    }
}
