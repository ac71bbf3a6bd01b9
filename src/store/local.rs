//! Filesystem-backed object store.
//!
//! Each bucket is a directory under the store root, and each key is a
//! relative path inside it: `<root>/<bucket>/<key>`.

use std::path::{Component, Path, PathBuf};

use super::{ObjectStore, StoreError};

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform data directory (`~/.local/share/mailfiler` on Linux).
    pub fn default_location() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailfiler");
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a bucket and key to a filesystem path.
    ///
    /// Absolute keys and keys with `..` components are refused, so writes
    /// cannot land outside the bucket directory.
    pub fn resolve(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        check_segment(bucket, "bucket")?;
        let rel = Path::new(key);
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid(key, "contains a '..' component"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid(key, "is an absolute path"));
                }
            }
        }
        if key.ends_with('/') || rel.file_name().is_none() {
            return Err(invalid(key, "does not name a file"));
        }
        Ok(self.root.join(bucket).join(rel))
    }
}

fn check_segment(name: &str, what: &str) -> Result<(), StoreError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidKey {
            key: name.to_string(),
            reason: format!("not a valid {what} name"),
        });
    }
    Ok(())
}

fn invalid(key: &str, reason: &str) -> StoreError {
    StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl ObjectStore for LocalStore {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(bucket, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        std::fs::write(&path, data).map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Wrote object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(tmp.path());
        store
            .put("course-bucket", "CS260/written assignment/WA1.pdf", b"data")
            .unwrap();
        let written = tmp
            .path()
            .join("course-bucket")
            .join("CS260")
            .join("written assignment")
            .join("WA1.pdf");
        assert_eq!(std::fs::read(written).unwrap(), b"data");
    }

    #[test]
    fn test_put_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(tmp.path());
        store.put("b", "k/file.txt", b"one").unwrap();
        store.put("b", "k/file.txt", b"two").unwrap();
        assert_eq!(
            std::fs::read(tmp.path().join("b/k/file.txt")).unwrap(),
            b"two"
        );
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let store = LocalStore::new("/tmp/unused");
        assert!(matches!(
            store.resolve("b", "../etc/passwd"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.resolve("b", "CS260/hw/../../../x"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.resolve("b", "/abs/key"),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.resolve("b", "CS260/hw/"),
            Err(StoreError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_bucket() {
        let store = LocalStore::new("/tmp/unused");
        assert!(store.resolve("", "a/b").is_err());
        assert!(store.resolve("..", "a/b").is_err());
        assert!(store.resolve("a/b", "c").is_err());
    }

    #[test]
    fn test_resolve_layout() {
        let store = LocalStore::new("/srv/objects");
        assert_eq!(
            store.resolve("bucket", "CS101/lecture/Lecture01.pptx").unwrap(),
            PathBuf::from("/srv/objects/bucket/CS101/lecture/Lecture01.pptx")
        );
    }
}
