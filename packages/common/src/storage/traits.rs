use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Object storage that accepts a stream and hands back a retrievable URL.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Store the contents of `reader` under `object_name` and return its public URL.
    async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        reader: BoxReader,
    ) -> Result<String, StorageError>;
}

/// Run `fut`, abandoning it with [`StorageError::Timeout`] once `deadline` elapses.
pub async fn within_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(deadline.as_secs())),
    }
}
