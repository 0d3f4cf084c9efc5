//! Amazon S3 (and S3-compatible) blob store

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{debug, info};

use super::{read_upload_source, write_local_file};
use crate::config::StorageConfig;
use crate::domain::{BlobStore, StorageError};

/// Validated S3 connection settings
#[derive(Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl S3Settings {
    /// Fails with every missing required setting listed
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let required = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let bucket = required(&config.bucket);
        let region = required(&config.region);
        let access_key_id = required(&config.access_key_id);
        let secret_access_key = required(&config.secret_access_key);

        let missing: Vec<&str> = [
            ("bucket (S3_BUCKET_NAME)", bucket.is_none()),
            ("region (AWS_DEFAULT_REGION)", region.is_none()),
            ("access key id (AWS_ACCESS_KEY_ID)", access_key_id.is_none()),
            ("secret access key (AWS_SECRET_ACCESS_KEY)", secret_access_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (bucket, region, access_key_id, secret_access_key) {
            (Some(bucket), Some(region), Some(access_key_id), Some(secret_access_key)) => {
                Ok(Self {
                    bucket,
                    region,
                    access_key_id,
                    secret_access_key,
                    endpoint_url: required(&config.endpoint_url),
                })
            }
            _ => Err(StorageError::configuration(format!(
                "Missing S3 settings: {}",
                missing.join(", ")
            ))),
        }
    }
}

#[derive(Debug)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn new(settings: S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(Credentials::new(
                settings.access_key_id.clone(),
                settings.secret_access_key.clone(),
                None,
                None,
                "iris-serve-config",
            ));
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if settings.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = ?settings.endpoint_url,
            "S3 blob store configured"
        );

        Self {
            client: Client::from_conf(builder.build()),
            bucket: settings.bucket,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let bytes = read_upload_source(local_path).await?;
        self.upload_bytes(Bytes::from(bytes), key).await
    }

    async fn upload_bytes(&self, bytes: Bytes, key: &str) -> Result<(), StorageError> {
        debug!(bucket = %self.bucket, key = %key, size = bytes.len(), "Uploading object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::transport(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        debug!(bucket = %self.bucket, key = %key, "Downloading object");

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::not_found(key)
                } else {
                    StorageError::transport(DisplayErrorContext(&e).to_string())
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::transport(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        write_local_file(local_path, &bytes).await
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
