//! Object storage: a bucket/key blob store that attachments are written to.

mod local;
mod memory;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a storage backend. These never fail a whole invocation; the
/// router logs them and moves on to the next attachment.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error with the associated file path.
    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The key cannot be stored by this backend.
    #[error("Invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A write-only view of a bucket/key blob store.
pub trait ObjectStore {
    /// Write (create or overwrite) the object at `key` in `bucket`.
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(bucket, key, data)
    }
}

impl<S: ObjectStore + ?Sized> ObjectStore for Box<S> {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(bucket, key, data)
    }
}
