//! S3-compatible object storage blob store (requires the `s3` feature).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use vanish_core::config::storage::S3StorageConfig;
use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::traits::storage::{BlobDeleteOutcome, BlobMetadata, BlobStore};

/// Blob store backed by an S3 bucket. The location handle is the object key.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3BlobStore {
    /// Build a client from configuration.
    ///
    /// Static credentials are used when an access key is configured,
    /// otherwise the default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration(
                "storage.s3.bucket is required for the s3 provider",
            ));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "vanish-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            builder = builder
                .endpoint_url(config.endpoint.clone())
                .force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            prefix: config.prefix.trim_matches('/').to_string(),
        })
    }

    fn object_key(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{key}", self.prefix)
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(|e| AppError::storage(format!("S3 health check failed: {}", DisplayErrorContext(&e))))
    }

    async fn put(&self, key: &str, data: Bytes, meta: &BlobMetadata) -> AppResult<String> {
        let object_key = self.object_key(key);
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .content_length(size as i64)
            .set_content_type(meta.mime_type.clone())
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to upload blob {object_key}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(key = %object_key, bytes = size, "Uploaded blob");
        Ok(object_key)
    }

    async fn get(&self, location: &str) -> AppResult<Option<Bytes>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(location)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to fetch blob {location}: {}",
                    DisplayErrorContext(&e)
                )));
            }
        };

        let data = output.body.collect().await.map_err(|e| {
            AppError::storage(format!("Failed to read blob {location}: {e}"))
        })?;
        debug!(location, "Fetched blob");
        Ok(Some(data.into_bytes()))
    }

    async fn delete(&self, location: &str) -> AppResult<BlobDeleteOutcome> {
        // S3 deletes succeed for absent keys, so probe first to report NotFound.
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(location)
            .send()
            .await
        {
            Ok(_) => {}
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => {
                return Ok(BlobDeleteOutcome::NotFound);
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to stat blob {location}: {}",
                    DisplayErrorContext(&e)
                )));
            }
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(location)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to delete blob {location}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(location, "Deleted blob");
        Ok(BlobDeleteOutcome::Deleted)
    }
}
