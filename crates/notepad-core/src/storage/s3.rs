//! S3-compatible object storage backed by `aws-sdk-s3`.

use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region;

use super::{guess_content_type, ObjectStorage};
use crate::config::StorageConfig;
use crate::{Error, Result};

/// Object storage over an S3-compatible bucket.
///
/// Keys are namespaced under the configured access-level prefix.
#[derive(Clone, Debug)]
pub struct S3Storage {
    config: StorageConfig,
    client: Client,
}

impl S3Storage {
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        let client = build_s3_client(&config);
        Self { config, client }
    }

    /// Full object key for a storage key, including the access-level prefix.
    pub fn object_key(&self, key: &str) -> Result<String> {
        let key = normalize_object_key(key)?;
        Ok(format!("{}{key}", self.config.key_prefix))
    }

    fn public_object_url(&self, object_key: &str) -> Option<String> {
        let base = self.config.public_base_url.as_ref()?;
        let encoded = object_key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{base}/{encoded}"))
    }
}

impl ObjectStorage for S3Storage {
    async fn get_url(&self, key: &str) -> Result<String> {
        let object_key = self.object_key(key)?;
        if let Some(url) = self.public_object_url(&object_key) {
            return Ok(url);
        }

        let presign_config = PresigningConfig::expires_in(self.config.url_ttl).map_err(|error| {
            storage_error("presign_config", &self.config.bucket, None, error)
        })?;
        let request = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .presigned(presign_config)
            .await
            .map_err(|error| {
                storage_error(
                    "presign_get_object",
                    &self.config.bucket,
                    Some(&object_key),
                    error,
                )
            })?;

        Ok(request.uri().to_string())
    }

    async fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()> {
        let object_key = self.object_key(key)?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()));

        let content_type = normalize_content_type(content_type).or_else(|| guess_content_type(key));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|error| {
            storage_error("put_object", &self.config.bucket, Some(&object_key), error)
        })?;

        tracing::debug!("Stored {} bytes at {}", bytes.len(), object_key);
        Ok(())
    }
}

fn build_s3_client(config: &StorageConfig) -> Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        config.session_token.clone(),
        None,
        "notepad-core-storage",
    );

    let mut builder = aws_sdk_s3::config::Builder::new()
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials);
    if let Some(endpoint_url) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url).force_path_style(true);
    }

    Client::from_conf(builder.build())
}

fn storage_error(
    operation: &str,
    bucket: &str,
    object_key: Option<&str>,
    error: impl std::fmt::Display,
) -> Error {
    let target = object_key.map_or_else(|| bucket.to_string(), |key| format!("{bucket}/{key}"));
    Error::Storage(format!("S3 {operation} failed for {target}: {error}"))
}

fn normalize_object_key(object_key: &str) -> Result<String> {
    let object_key = object_key.trim().trim_matches('/').to_string();
    if object_key.is_empty() {
        return Err(Error::InvalidInput(
            "Storage key cannot be empty".to_string(),
        ));
    }
    Ok(object_key)
}

fn normalize_content_type(content_type: Option<&str>) -> Option<String> {
    content_type
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
