use thiserror::Error;

/// Errors that can occur while handing an object to the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred while reading the upload source.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The upload did not finish within the configured deadline.
    #[error("upload timed out after {0} seconds")]
    Timeout(u64),
    /// The backend rejected the object or could not be reached.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The backend could not be configured (bad region, missing credentials).
    #[error("storage configuration error: {0}")]
    Config(String),
}
