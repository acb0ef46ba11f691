//! Upload Store
//!
//! Reassembles chunked uploads on local disk. Chunks arrive in order and are
//! appended to `<base>/<file name>`; chunk 0 truncates any earlier upload
//! with the same name.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Chunk index out of bounds: {index} (total: {total})")]
    ChunkIndexOutOfBounds { index: usize, total: usize },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl UploadError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            Self::ChunkIndexOutOfBounds { .. } => StatusCode::BAD_REQUEST,
            Self::FileNotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// Upload Store
// ============================================================================

/// Local directory holding uploaded documents
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Create the upload directory if missing
    pub async fn init(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| UploadError::StorageError(format!("Failed to create upload dir: {}", e)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path for an uploaded file, rejecting anything but a bare file name
    fn file_path(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        let is_bare = Path::new(file_name)
            .file_name()
            .map(|name| name == file_name)
            .unwrap_or(false);

        if file_name.is_empty() || !is_bare || file_name.contains('\\') {
            return Err(UploadError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.base_path.join(file_name))
    }

    /// Append one chunk of an upload, returning the file size so far
    pub async fn append_chunk(
        &self,
        file_name: &str,
        index: usize,
        total: usize,
        data: &[u8],
    ) -> Result<u64, UploadError> {
        if index >= total {
            return Err(UploadError::ChunkIndexOutOfBounds { index, total });
        }

        let path = self.file_path(file_name)?;

        let mut options = tokio::fs::OpenOptions::new();
        options.create(true);
        if index == 0 {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| UploadError::StorageError(format!("Failed to open {}: {}", file_name, e)))?;
        file.write_all(data)
            .await
            .map_err(|e| UploadError::StorageError(format!("Failed to write chunk: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| UploadError::StorageError(format!("Failed to flush chunk: {}", e)))?;

        let size = file
            .metadata()
            .await
            .map_err(|e| UploadError::StorageError(e.to_string()))?
            .len();

        tracing::debug!(
            file_name = %file_name,
            chunk = index + 1,
            total,
            size,
            "Stored upload chunk"
        );

        Ok(size)
    }

    /// Check whether an upload is present
    pub async fn exists(&self, file_name: &str) -> Result<bool, UploadError> {
        let path = self.file_path(file_name)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Read a completed upload
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, UploadError> {
        let path = self.file_path(file_name)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => UploadError::FileNotFound(file_name.to_string()),
            _ => UploadError::StorageError(format!("Failed to read {}: {}", file_name, e)),
        })
    }
}
