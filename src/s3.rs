//! S3 implementation of the single-item store operations.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client as S3Client,
};
use tracing::debug;

use crate::{
    bucket,
    config::MediaStorageConfig,
    error::{MediaError, MediaResult},
    store::MediaStore,
    types::MediaPayload,
};

/// S3-backed [`MediaStore`].
pub struct S3MediaStore {
    client: S3Client,
    bucket: String,
    content_type: String,
}

impl S3MediaStore {
    /// Build the client from static credentials and ensure the target bucket
    /// exists, installing a public-read policy if it was just created.
    ///
    /// The client uses path-style addressing to support S3-compatible
    /// endpoints (MinIO, LocalStack).
    pub async fn new(config: &MediaStorageConfig) -> MediaResult<Self> {
        let client = build_client(config);
        bucket::ensure_bucket(&client, &config.bucket).await?;
        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            content_type: config.content_type.clone(),
        })
    }
}

fn build_client(config: &MediaStorageConfig) -> S3Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "media-gateway-static",
    );
    let s3_config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(config.endpoint_url())
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();
    S3Client::from_conf(s3_config)
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put(&self, object_id: &str, payload: MediaPayload) -> MediaResult<()> {
        let MediaPayload { name, data } = payload;
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_id)
            .content_type(&self.content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .context("S3 put_object failed")
            .map_err(|source| MediaError::Store {
                object_id: object_id.to_string(),
                source,
            })?;
        debug!(bucket = %self.bucket, object_id, name = %name, size, "Uploaded object");
        Ok(())
    }

    async fn presign_get(&self, object_id: &str, expires_in: Duration) -> MediaResult<String> {
        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(|e| MediaError::Presign {
                object_id: object_id.to_string(),
                reason: format!("Failed to build presigning config: {}", e),
            })?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_id)
            .presigned(presigning)
            .await
            .map_err(|e| MediaError::Presign {
                object_id: object_id.to_string(),
                reason: format!("Failed to presign GET URL: {}", e),
            })?;
        Ok(request.uri().to_string())
    }

    async fn delete(&self, object_id: &str) -> MediaResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_id)
            .send()
            .await
            .context("S3 delete_object failed")
            .map_err(|source| MediaError::Store {
                object_id: object_id.to_string(),
                source,
            })?;
        debug!(bucket = %self.bucket, object_id, "Deleted object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    // These tests require MinIO (or another S3-compatible store) on
    // localhost:9000 with credentials minioadmin/minioadmin; they skip
    // themselves when the endpoint is unreachable.

    fn test_config() -> MediaStorageConfig {
        MediaStorageConfig {
            endpoint: "localhost:9000".to_string(),
            use_tls: false,
            region: "us-east-1".to_string(),
            bucket: "media-gateway-test".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            public_base_url: "http://localhost:9000/media-gateway-test".to_string(),
            presign_ttl_secs: 24 * 60 * 60,
            content_type: "image/png".to_string(),
            max_concurrency: 4,
        }
    }

    #[tokio::test]
    async fn test_put_presign_delete_roundtrip() {
        let store = match S3MediaStore::new(&test_config()).await {
            Ok(store) => store,
            Err(_) => {
                println!("minio not reachable, skipping test");
                return;
            }
        };

        let payload = MediaPayload {
            name: "cover.png".to_string(),
            data: Bytes::from_static(b"not really a png"),
        };
        store.put("it-object-1", payload).await.unwrap();

        let url = store
            .presign_get("it-object-1", Duration::from_secs(600))
            .await
            .unwrap();
        assert!(url.contains("it-object-1"));

        store.delete("it-object-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_length_payload_accepted() {
        let store = match S3MediaStore::new(&test_config()).await {
            Ok(store) => store,
            Err(_) => {
                println!("minio not reachable, skipping test");
                return;
            }
        };

        let payload = MediaPayload {
            name: "empty.png".to_string(),
            data: Bytes::new(),
        };
        store.put("it-object-empty", payload).await.unwrap();
        store.delete("it-object-empty").await.unwrap();
    }

    #[tokio::test]
    async fn test_bucket_init_is_idempotent() {
        let config = test_config();
        if S3MediaStore::new(&config).await.is_err() {
            println!("minio not reachable, skipping test");
            return;
        }
        // Rerunning against the existing bucket must be a no-op.
        S3MediaStore::new(&config).await.unwrap();
    }
}
