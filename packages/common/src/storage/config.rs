use serde::Deserialize;

/// Object storage configuration.
///
/// Uploads are disabled when `bucket` is unset.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Bucket name. Default: unset (uploads disabled).
    #[serde(default)]
    pub bucket: Option<String>,
    /// Region name passed to the S3 signer. Default: "auto".
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint. Default: "https://storage.googleapis.com".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Base URL used to build public object URLs. Default: `{endpoint}/{bucket}`.
    #[serde(default)]
    pub public_url: Option<String>,
    /// Access key. When absent, credentials come from the environment/profile.
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Per-upload deadline in seconds. Default: 50.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    /// Maximum size of a single uploaded file in bytes. Default: 10 MiB.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_region() -> String {
    "auto".into()
}
fn default_endpoint() -> String {
    "https://storage.googleapis.com".into()
}
fn default_upload_timeout_secs() -> u64 {
    50
}
fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
            endpoint: default_endpoint(),
            public_url: None,
            access_key: None,
            secret_key: None,
            upload_timeout_secs: default_upload_timeout_secs(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl StorageConfig {
    /// The configured bucket, treating a blank value as unset.
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Public URL under which `object_name` will be reachable.
    pub fn object_url(&self, object_name: &str) -> Option<String> {
        let bucket = self.bucket_name()?;
        let base = match self.public_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/{}", self.endpoint.trim_end_matches('/'), bucket),
        };
        let path = object_name
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{base}/{path}"))
    }
}
