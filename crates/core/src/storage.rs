//! Blob store backing attachment files.
//!
//! A thin wrapper over an OpenDAL filesystem operator rooted at the upload
//! directory. Stored names are generated by [`crate::naming::stored_name`],
//! so keys never contain path separators.

use std::path::{Path, PathBuf};

use opendal::{ErrorKind, Operator, services};

use crate::advisory::AdvisoryFailure;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Backing root could not be prepared or the operator built.
    #[error("blob store configuration error: {0}")]
    Configuration(String),
    /// Read/write/delete failure.
    #[error("blob operation failed: {0}")]
    Operation(String),
}

/// Filesystem-backed store for attachment blobs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    operator: Operator,
    root: PathBuf,
}

impl BlobStore {
    /// Open a blob store rooted at `root`, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the operator
    /// cannot be built.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, BlobError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| BlobError::Configuration(e.to_string()))?;

        let builder = services::Fs::default().root(
            root.to_str()
                .ok_or_else(|| BlobError::Configuration("invalid root path".to_string()))?,
        );
        let operator = Operator::new(builder)
            .map_err(|e| BlobError::Configuration(e.to_string()))?
            .finish();

        Ok(Self { operator, root })
    }

    /// The backing directory, for mounting a static file service over it.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist blob content under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&self, name: &str, content: Vec<u8>) -> Result<(), BlobError> {
        self.operator
            .write(name, content)
            .await
            .map(|_| ())
            .map_err(|e| BlobError::Operation(e.to_string()))
    }

    /// Read blob content back.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is absent or unreadable.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, BlobError> {
        self.operator
            .read(name)
            .await
            .map(|buf| buf.to_vec())
            .map_err(|e| BlobError::Operation(e.to_string()))
    }

    /// Whether a blob exists under `name`.
    pub async fn exists(&self, name: &str) -> bool {
        match self.operator.stat(name).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Delete a blob. Deleting an absent blob is success.
    ///
    /// # Errors
    ///
    /// Returns an error only on real I/O failures.
    pub async fn delete(&self, name: &str) -> Result<(), BlobError> {
        match self.operator.delete(name).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Operation(e.to_string())),
        }
    }

    /// Best-effort deletion for cleanup paths. A failure is reported as an
    /// advisory, never an error.
    pub async fn remove_quietly(&self, name: &str) -> Option<AdvisoryFailure> {
        match self.delete(name).await {
            Ok(()) => None,
            Err(e) => Some(AdvisoryFailure::new(
                "delete_blob",
                name.to_string(),
                e.to_string(),
            )),
        }
    }
}
