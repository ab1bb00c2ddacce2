//! Shell-glob path matching and recursive expansion.
//!
//! A pattern is split on `/` into components and each component is a
//! shell glob (`*`, `?`, `[...]`). A relative pattern matches any path whose
//! trailing components match it, so `*.lua` matches `lib/a/x.lua`. An
//! absolute pattern must match the whole path. There is no `**` operator:
//! recursion comes from [`expand`], not from the pattern. Braces are plain
//! characters, not alternation.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{LinktreeError, Result};
use crate::ports::filesystem::FileSystem;

/// A compiled filter pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    absolute: bool,
    components: Vec<GlobMatcher>,
}

impl Pattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`LinktreeError::InvalidPattern`] if the pattern is empty,
    /// uses `**`, or is not a valid glob.
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| LinktreeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let absolute = pattern.starts_with('/');
        let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return Err(invalid("empty pattern"));
        }

        let mut components = Vec::with_capacity(parts.len());
        for part in parts {
            if part.contains("**") {
                return Err(invalid("recursive '**' is not supported"));
            }
            let glob = GlobBuilder::new(&escape_braces(part))
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|e| invalid(&e.to_string()))?;
            components.push(glob.compile_matcher());
        }

        Ok(Self { source: pattern.to_string(), absolute, components })
    }

    /// The pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let parts = path_components(path);
        if parts.len() < self.components.len() {
            return false;
        }
        if self.absolute && (!path.has_root() || parts.len() != self.components.len()) {
            return false;
        }

        let tail = &parts[parts.len() - self.components.len()..];
        tail.iter().zip(&self.components).all(|(part, glob)| glob.is_match(Path::new(part)))
    }
}

/// Returns `true` if `path` matches `pattern`.
///
/// # Errors
///
/// Returns an error if `pattern` does not compile.
pub fn matches(path: &Path, pattern: &str) -> Result<bool> {
    Ok(Pattern::new(pattern)?.matches(path))
}

/// Walks `root` through `fs` and returns every descendant whose path
/// relative to `root` matches `pattern`.
///
/// Entries come out in a single pre-order walk with siblings sorted by name.
/// Symlinked directories below `root` are reported but not descended into.
/// `root` itself is never returned.
///
/// # Errors
///
/// Returns the I/O error if the walk fails.
pub fn expand(fs: &dyn FileSystem, root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>> {
    let mut found = fs.walk(root)?;
    found.retain(|path| pattern.matches(path.strip_prefix(root).unwrap_or(path)));
    Ok(found)
}

fn path_components(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            Component::ParentDir => Some(OsStr::new("..")),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => None,
        })
        .collect()
}

/// Rewrites `{` and `}` outside character classes as one-character classes
/// so globset reads them literally.
fn escape_braces(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut chars = part.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            '[' => {
                out.push(c);
                if let Some(&negate @ ('!' | '^')) = chars.peek() {
                    out.push(negate);
                    chars.next();
                }
                // A leading `]` is a member, not the end of the class.
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
                for c in chars.by_ref() {
                    out.push(c);
                    if c == ']' {
                        break;
                    }
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::context::testing::{MemFs, Node};
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn relative_pattern_matches_trailing_components() {
        let pattern = Pattern::new("*.lua").unwrap();
        assert!(pattern.matches(Path::new("x.lua")));
        assert!(pattern.matches(Path::new("/repo/lib/a/x.lua")));
        assert!(!pattern.matches(Path::new("lib/x.lua/readme.md")));

        let nested = Pattern::new("a/*.lua").unwrap();
        assert!(nested.matches(Path::new("lib/a/x.lua")));
        assert!(!nested.matches(Path::new("lib/b/x.lua")));
        assert!(!nested.matches(Path::new("x.lua")));
    }

    #[test]
    fn star_does_not_cross_separators() {
        let pattern = Pattern::new("lib*x.lua").unwrap();
        assert!(pattern.matches(Path::new("lib_x.lua")));
        assert!(!pattern.matches(Path::new("lib/x.lua")));
    }

    #[test]
    fn absolute_pattern_must_match_whole_path() {
        let pattern = Pattern::new("/repo/*.txt").unwrap();
        assert!(pattern.matches(Path::new("/repo/notes.txt")));
        assert!(!pattern.matches(Path::new("/other/repo/notes.txt")));
        assert!(!pattern.matches(Path::new("repo/notes.txt")));
    }

    #[test]
    fn question_mark_and_classes() {
        assert!(matches(Path::new("a1.txt"), "a?.txt").unwrap());
        assert!(matches(Path::new("b.txt"), "[abc].txt").unwrap());
        assert!(!matches(Path::new("d.txt"), "[abc].txt").unwrap());
    }

    #[test]
    fn rejects_recursive_and_empty_patterns() {
        assert!(Pattern::new("**/*.lua").is_err());
        assert!(Pattern::new("").is_err());
        assert!(Pattern::new("[unclosed").is_err());
    }

    #[test]
    fn braces_are_literal_characters() {
        let pattern = Pattern::new("{a,b}.txt").unwrap();
        assert!(!pattern.matches(Path::new("a.txt")));
        assert!(!pattern.matches(Path::new("b.txt")));
        assert!(pattern.matches(Path::new("dir/{a,b}.txt")));

        // Braces inside a class stay members of that class.
        let class = Pattern::new("[{x]*.lua").unwrap();
        assert!(class.matches(Path::new("{m}.lua")));
        assert!(class.matches(Path::new("x.lua")));
        assert!(!class.matches(Path::new("y.lua")));
        assert!(matches(Path::new("]}.md"), "[]]}.md").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn matches_names_that_are_not_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let name = Path::new(OsStr::from_bytes(b"caf\xe9.lua"));
        assert!(Pattern::new("*.lua").unwrap().matches(&Path::new("/lib").join(name)));
        assert!(Pattern::new("caf?.lua").unwrap().matches(name));
        assert!(!Pattern::new("caf\u{fffd}.lua").unwrap().matches(name));
    }

    #[test]
    fn expand_walks_the_filesystem_port() {
        let fs = MemFs::with_dirs(&["/repo/lib", "/repo/lib/b", "/repo/lib/a"]);
        {
            let mut nodes = fs.nodes.lock().unwrap();
            nodes.insert(PathBuf::from("/repo/lib/b/y.lua"), Node::File(String::new()));
            nodes.insert(PathBuf::from("/repo/lib/a/x.lua"), Node::File(String::new()));
            nodes.insert(PathBuf::from("/repo/lib/a.lua"), Node::Link("/elsewhere".into()));
            nodes.insert(PathBuf::from("/repo/other.lua"), Node::File(String::new()));
        }

        let pattern = Pattern::new("*.lua").unwrap();
        let found = expand(&fs, Path::new("/repo/lib"), &pattern).unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/repo/lib/a/x.lua"),
                PathBuf::from("/repo/lib/a.lua"),
                PathBuf::from("/repo/lib/b/y.lua"),
            ]
        );
    }

    #[test]
    fn expand_walks_in_pre_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b/y.lua");
        touch(dir.path(), "a/x.lua");
        touch(dir.path(), "a/notes.md");
        touch(dir.path(), "top.lua");

        let pattern = Pattern::new("*.lua").unwrap();
        let found: Vec<PathBuf> = expand(&LiveFileSystem, dir.path(), &pattern)
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![PathBuf::from("a/x.lua"), PathBuf::from("b/y.lua"), PathBuf::from("top.lua")]
        );
    }

    #[test]
    fn expand_matches_relative_to_root_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/inner/m.lua");

        // The root's own name is not part of the candidate path.
        let root = dir.path().join("src");
        let pattern = Pattern::new("src/*/m.lua").unwrap();
        assert!(expand(&LiveFileSystem, &root, &pattern).unwrap().is_empty());

        let pattern = Pattern::new("inner/m.lua").unwrap();
        assert_eq!(expand(&LiveFileSystem, &root, &pattern).unwrap().len(), 1);
    }
}
