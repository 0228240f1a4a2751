//! Batched media storage gateway for the storefront backend.
//!
//! Uploads, resolves display URLs for, and deletes binary media assets
//! (product images, user avatars) against an S3-compatible object store.
//! Batch operations fan out to concurrent tasks over a bounded slot pool;
//! the first failing item cancels remaining unstarted work, and the batch
//! returns whatever completed alongside that first error.
//!
//! The gateway holds no state of its own between calls; the remote store is
//! the system of record. Object IDs are generated here at upload time and are
//! the sole handle for later get/delete; callers persist them (e.g. on a
//! product record) to reference an object again.
//!
//! # Usage
//!
//! ```rust,no_run
//! use media_gateway::{MediaGateway, MediaPayload, MediaStorageConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), media_gateway::MediaError> {
//! let config = MediaStorageConfig::from_path("media.yaml")?;
//! let meter = opentelemetry::global::meter("storefront");
//! let gateway = MediaGateway::new(config, &meter).await?;
//!
//! let payload = MediaPayload {
//!     name: "cover.png".to_string(),
//!     data: bytes::Bytes::from_static(b"..."),
//! };
//! let uploaded = gateway.create_one(payload).await?;
//!
//! // Display URLs are pure string templating; no network involved.
//! let url = gateway.get_one(&uploaded.object_id);
//! assert!(url.ends_with(&uploaded.object_id));
//!
//! let outcome = gateway
//!     .delete_many(vec![uploaded.object_id], &CancellationToken::new())
//!     .await;
//! assert!(outcome.is_complete());
//! # Ok(())
//! # }
//! ```

mod batch;
mod bucket;
mod config;
mod error;
mod gateway;
mod metrics;
mod s3;
mod store;
mod types;

pub use batch::BatchOutcome;
pub use config::{MediaStorageConfig, MAX_PRESIGN_TTL_SECS};
pub use error::{MediaError, MediaResult};
pub use gateway::MediaGateway;
pub use metrics::{GatewayMetrics, Timer};
pub use s3::S3MediaStore;
pub use store::MediaStore;
pub use types::{MediaPayload, UploadResult};
