//! Lazy recursive scan for candidate image files.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted as candidate images, matched case-insensitively.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to list directory {path}: {source}")]
    ReadDir { path: String, source: io::Error },
}

/// Depth-first walk over a directory tree, yielding image files.
///
/// Uses an explicit directory stack instead of recursion, so tree depth is
/// unbounded. Entries are sorted per directory, which makes the sequence
/// deterministic for a given snapshot. A directory that cannot be listed
/// mid-walk surfaces as an error item rather than being skipped. Symlink
/// cycles are not detected.
///
/// Each `ImageWalk::new` performs a fresh traversal; no state is cached.
pub struct ImageWalk {
    dirs: Vec<PathBuf>,
    files: VecDeque<PathBuf>,
}

impl ImageWalk {
    pub fn new(root: &Path) -> Self {
        Self {
            dirs: vec![root.to_path_buf()],
            files: VecDeque::new(),
        }
    }

    fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false)
    }

    fn list_sorted(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }
}

impl Iterator for ImageWalk {
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.files.pop_front() {
                return Some(Ok(file));
            }

            let dir = self.dirs.pop()?;
            let entries = match Self::list_sorted(&dir) {
                Ok(entries) => entries,
                Err(source) => {
                    return Some(Err(ScanError::ReadDir {
                        path: dir.display().to_string(),
                        source,
                    }));
                }
            };

            let mut subdirs = Vec::new();
            for path in entries {
                if path.is_dir() {
                    subdirs.push(path);
                } else if Self::is_image(&path) {
                    self.files.push_back(path);
                }
            }
            // Reverse before pushing so the stack pops subdirectories in
            // sorted order.
            while let Some(sub) = subdirs.pop() {
                self.dirs.push(sub);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    fn collect(root: &Path) -> Vec<PathBuf> {
        ImageWalk::new(root).map(|item| item.unwrap()).collect()
    }

    #[test]
    fn test_walk_filters_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/sub2")).unwrap();
        touch(&root.join("a.jpg"));
        touch(&root.join("sub/b.png"));
        touch(&root.join("sub/sub2/c.txt"));

        let found = collect(root);
        assert_eq!(found, vec![root.join("a.jpg"), root.join("sub/b.png")]);
    }

    #[test]
    fn test_walk_extension_case_insensitive() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("a.JPG"));
        touch(&root.join("b.Png"));
        touch(&root.join("c.JPEG"));
        touch(&root.join("d.GIF"));
        touch(&root.join("e.bmp"));
        touch(&root.join("noext"));

        let found = collect(root);
        assert_eq!(found.len(), 4);
        assert!(!found.iter().any(|p| p.ends_with("e.bmp")));
    }

    #[test]
    fn test_walk_visits_each_file_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("x/y/z")).unwrap();
        touch(&root.join("top.png"));
        touch(&root.join("x/mid.jpg"));
        touch(&root.join("x/y/z/deep.gif"));

        let found = collect(root);
        assert_eq!(found.len(), 3);
        let mut deduped = found.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);
        assert!(found.contains(&root.join("x/y/z/deep.gif")));
    }

    #[test]
    fn test_walk_is_deterministic() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        touch(&root.join("c.jpg"));
        touch(&root.join("b/d.jpg"));
        touch(&root.join("a/e.jpg"));

        let first = collect(root);
        let second = collect(root);
        assert_eq!(first, second);
        // Root files come first, then subdirectories in sorted order.
        assert_eq!(
            first,
            vec![
                root.join("c.jpg"),
                root.join("a/e.jpg"),
                root.join("b/d.jpg"),
            ]
        );
    }

    #[test]
    fn test_walk_missing_root_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut walk = ImageWalk::new(&dir.path().join("absent"));
        let first = walk.next().unwrap();
        assert!(matches!(first, Err(ScanError::ReadDir { .. })));
    }

    #[test]
    fn test_walk_fresh_traversal_sees_new_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("a.jpg"));
        assert_eq!(collect(root).len(), 1);

        touch(&root.join("b.jpg"));
        assert_eq!(collect(root).len(), 2);
    }
}
