//! One-time bucket initialization.

use aws_sdk_s3::{error::SdkError, Client as S3Client};
use serde_json::json;
use tracing::info;

use crate::error::{MediaError, MediaResult};

/// Ensure the target bucket exists, installing a public-read policy when the
/// bucket is first created. Reads stay anonymous; writes and deletes remain
/// credential-gated.
///
/// Runs once at startup. Failures are fatal to the caller and not retried
/// here; retries belong to the process supervisor.
pub(crate) async fn ensure_bucket(client: &S3Client, bucket: &str) -> MediaResult<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(err)) if err.err().is_not_found() => {}
        Err(err) => {
            return Err(MediaError::Connectivity {
                source: anyhow::Error::from(err)
                    .context(format!("HeadBucket for '{}' failed", bucket)),
            });
        }
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => {}
        // Lost a startup race to a sibling process; the policy is theirs.
        Err(SdkError::ServiceError(err)) if err.err().is_bucket_already_owned_by_you() => {
            return Ok(());
        }
        Err(err) => {
            return Err(MediaError::Connectivity {
                source: anyhow::Error::from(err)
                    .context(format!("CreateBucket for '{}' failed", bucket)),
            });
        }
    }
    info!(bucket, "Created bucket");

    client
        .put_bucket_policy()
        .bucket(bucket)
        .policy(public_read_policy(bucket).to_string())
        .send()
        .await
        .map_err(|err| MediaError::Connectivity {
            source: anyhow::Error::from(err)
                .context(format!("PutBucketPolicy for '{}' failed", bucket)),
        })?;
    info!(bucket, "Applied public-read bucket policy");

    Ok(())
}

/// Policy document granting anonymous GET on every object in the bucket.
pub(crate) fn public_read_policy(bucket: &str) -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": ["*"] },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/*", bucket)],
        }]
    })
}
