//! Where rendered QR images end up.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::QrError;

/// Persists image bytes and returns an address clients can fetch them from.
pub trait ImageStorage: Send + Sync {
    fn store(&self, bytes: &[u8], file_name: &str) -> Result<String, QrError>;
}

/// Writes images into a local directory served under `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStorage {
    /// Create the storage, making `root` if it does not exist.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self, QrError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| QrError::ImageStorage(format!("create {}: {e}", root.display())))?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageStorage for LocalImageStorage {
    fn store(&self, bytes: &[u8], file_name: &str) -> Result<String, QrError> {
        if file_name.is_empty()
            || file_name.contains(&['/', '\\'][..])
            || file_name.starts_with('.')
        {
            return Err(QrError::ImageStorage(format!("invalid file name: {file_name:?}")));
        }

        let path = self.root.join(file_name);
        fs::write(&path, bytes)
            .map_err(|e| QrError::ImageStorage(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), size = bytes.len(), "Stored QR image");

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        ))
    }
}
