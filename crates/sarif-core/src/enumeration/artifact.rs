use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use sha2::{Digest, Sha256};
use url::Url;

use super::file_system::FileSystem;
use crate::errors::EnumerationError;

/// A file produced by the enumerator. Contents are read on first use and
/// cached; the artifact is never mutated otherwise.
#[derive(Clone)]
pub struct EnumeratedArtifact {
    uri: Url,
    path: PathBuf,
    file_system: Arc<dyn FileSystem>,
    bytes: OnceLock<Arc<Vec<u8>>>,
}

impl EnumeratedArtifact {
    pub fn new(path: PathBuf, file_system: Arc<dyn FileSystem>) -> Result<Self, EnumerationError> {
        let uri = Url::from_file_path(&path).map_err(|()| EnumerationError::InvalidPath(path.clone()))?;
        Ok(Self {
            uri,
            path,
            file_system,
            bytes: OnceLock::new(),
        })
    }

    /// Absolute `file:` URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_in_bytes(&self) -> io::Result<u64> {
        match self.bytes.get() {
            Some(bytes) => Ok(bytes.len() as u64),
            None => self.file_system.file_length(&self.path),
        }
    }

    pub fn bytes(&self) -> io::Result<Arc<Vec<u8>>> {
        if let Some(bytes) = self.bytes.get() {
            return Ok(Arc::clone(bytes));
        }
        let read = Arc::new(self.file_system.read_all_bytes(&self.path)?);
        Ok(Arc::clone(self.bytes.get_or_init(|| read)))
    }

    /// Contents decoded as UTF-8; invalid sequences are replaced.
    pub fn contents(&self) -> io::Result<String> {
        Ok(String::from_utf8_lossy(&self.bytes()?).into_owned())
    }

    /// Lowercase hex SHA-256 of the contents.
    pub fn sha256(&self) -> io::Result<String> {
        let bytes = self.bytes()?;
        Ok(hex::encode(Sha256::digest(bytes.as_slice())))
    }
}

impl fmt::Debug for EnumeratedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumeratedArtifact")
            .field("uri", &self.uri.as_str())
            .finish()
    }
}

impl PartialEq for EnumeratedArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::file_system::LocalFileSystem;

    #[test]
    fn test_lazy_contents_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello").unwrap();

        let artifact = EnumeratedArtifact::new(path.clone(), Arc::new(LocalFileSystem)).unwrap();
        assert_eq!(artifact.uri().scheme(), "file");
        assert_eq!(artifact.uri().to_file_path().unwrap(), path);
        assert_eq!(artifact.size_in_bytes().unwrap(), 5);
        assert_eq!(artifact.contents().unwrap(), "hello");
        assert_eq!(
            artifact.sha256().unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );

        // Cached after the first read.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(artifact.contents().unwrap(), "hello");
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let err = EnumeratedArtifact::new(PathBuf::from("rel/a.txt"), Arc::new(LocalFileSystem))
            .unwrap_err();
        assert!(matches!(err, EnumerationError::InvalidPath(_)));
    }
}
