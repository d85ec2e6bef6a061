use std::time::Duration;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, instrument};

use super::config::StorageConfig;
use super::error::StorageError;
use super::traits::{BoxReader, ObjectUploader, within_deadline};

/// Uploader backed by an S3-compatible bucket (GCS interoperability, MinIO, AWS).
pub struct S3Uploader {
    bucket: Box<Bucket>,
    config: StorageConfig,
    deadline: Duration,
}

impl S3Uploader {
    /// Build an uploader from configuration.
    ///
    /// Returns `Ok(None)` when no bucket is configured.
    pub fn from_config(config: &StorageConfig) -> Result<Option<Self>, StorageError> {
        let Some(bucket_name) = config.bucket_name() else {
            return Ok(None);
        };

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let credentials = match (config.access_key.as_deref(), config.secret_key.as_deref()) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access), Some(secret), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Config(e.to_string()))?;

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?
            .with_path_style();

        Ok(Some(Self {
            bucket,
            config: config.clone(),
            deadline: Duration::from_secs(config.upload_timeout_secs),
        }))
    }
}

#[async_trait]
impl ObjectUploader for S3Uploader {
    #[instrument(skip(self, reader), fields(bucket = %self.bucket.name()))]
    async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        mut reader: BoxReader,
    ) -> Result<String, StorageError> {
        let response = within_deadline(self.deadline, async {
            self.bucket
                .put_object_stream_with_content_type(&mut reader, object_name, content_type)
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))
        })
        .await?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "bucket responded with status {status}"
            )));
        }

        debug!(object_name, status, "object stored");

        self.config
            .object_url(object_name)
            .ok_or_else(|| StorageError::Config("bucket is not configured".into()))
    }
}
