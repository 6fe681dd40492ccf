//! File system seam used by the enumerator, injectable for tests.

use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::errors::EnumerationError;

/// Filename glob applied to the direct children of one directory.
#[derive(Debug, Clone)]
pub struct FileFilter {
    pattern: String,
    matcher: GlobMatcher,
}

impl FileFilter {
    /// An empty pattern matches every file.
    pub fn new(pattern: &str) -> Result<Self, EnumerationError> {
        let pattern = if pattern.is_empty() { "*" } else { pattern };
        let glob = Glob::new(pattern).map_err(|e| EnumerationError::InvalidFilter {
            filter: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}

pub trait FileSystem: Send + Sync {
    fn file_exists(&self, path: &Path) -> bool;

    fn directory_exists(&self, path: &Path) -> bool;

    /// Full paths of the files directly inside `directory` whose names match
    /// `filter`, in no particular order.
    fn enumerate_files(&self, directory: &Path, filter: &FileFilter) -> io::Result<Vec<PathBuf>>;

    /// Full paths of the directories directly inside `directory`, including
    /// symbolic links that resolve to directories.
    fn enumerate_directories(&self, directory: &Path) -> io::Result<Vec<PathBuf>>;

    fn is_symbolic_link(&self, path: &Path) -> bool;

    fn file_length(&self, path: &Path) -> io::Result<u64>;

    fn read_all_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn enumerate_files(&self, directory: &Path, filter: &FileFilter) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if filter.is_match(&entry.file_name().to_string_lossy()) {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn enumerate_directories(&self, directory: &Path) -> io::Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_dir() {
                directories.push(path);
            }
        }
        Ok(directories)
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn file_length(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn read_all_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_file_names() {
        let filter = FileFilter::new("Test*.txt").unwrap();
        assert!(filter.is_match("TestFile0.txt"));
        assert!(!filter.is_match("other.txt"));
        assert!(FileFilter::new("").unwrap().is_match("anything"));
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = FileFilter::new("[a-").unwrap_err();
        assert!(matches!(err, EnumerationError::InvalidFilter { .. }));
    }

    #[test]
    fn test_local_listing_separates_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.log"), "b").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let fs = LocalFileSystem;
        let files = fs
            .enumerate_files(dir.path(), &FileFilter::new("*.txt").unwrap())
            .unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);

        let dirs = fs.enumerate_directories(dir.path()).unwrap();
        assert_eq!(dirs, vec![dir.path().join("sub")]);
        assert_eq!(fs.file_length(&dir.path().join("a.txt")).unwrap(), 1);
    }
}
