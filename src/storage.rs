//! Optional persistence of raw uploads.
//!
//! Writes are a side effect only: nothing here is read back by the pipeline,
//! and callers log failures instead of aborting the batch.

use std::path::{Path, PathBuf};

use crate::types::Document;
use crate::{Result, TonalityError};

/// Directory that receives raw uploaded bytes, keyed by file name.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a document would be written to.
    ///
    /// Only the final component of the filename is used, so uploads cannot
    /// escape the store directory.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| TonalityError::InvalidInput(format!("unusable filename: {filename:?}")))?;
        Ok(self.root.join(name))
    }

    /// Write a document's raw bytes, overwriting any previous upload with the
    /// same name.
    pub async fn save(&self, document: &Document) -> Result<PathBuf> {
        let path = self.path_for(&document.filename)?;
        tokio::fs::write(&path, &document.content).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads")).await.unwrap();
        assert_eq!(store.root(), dir.path().join("uploads"));

        let doc = Document::new("call.txt", vec![0xff, b'h', b'i']);
        let path = store.save(&doc).await.unwrap();

        assert_eq!(path, dir.path().join("uploads").join("call.txt"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![0xff, b'h', b'i']);
    }

    #[tokio::test]
    async fn traversal_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).await.unwrap();

        let path = store.path_for("../../etc/passwd").unwrap();
        assert_eq!(path, dir.path().join("passwd"));
    }

    #[test]
    fn empty_filename_is_rejected() {
        let store = UploadStore {
            root: PathBuf::from("/tmp"),
        };
        assert!(store.path_for("").is_err());
        assert!(store.path_for("..").is_err());
    }
}
