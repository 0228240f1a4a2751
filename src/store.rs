//! Single-item store operations.

use std::time::Duration;

use async_trait::async_trait;

use crate::{error::MediaResult, types::MediaPayload};

/// One put, presign, or delete against the object store for a single key.
///
/// The batch executor fans out over these operations, so implementations must
/// be safe to call concurrently. [`S3MediaStore`](crate::S3MediaStore) is the
/// production implementation; tests substitute recording doubles here.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one object under `object_id`. A zero-length payload is valid
    /// and stored as a zero-length object.
    async fn put(&self, object_id: &str, payload: MediaPayload) -> MediaResult<()>;

    /// Generate a time-limited GET URL for one object.
    ///
    /// Does not verify that the object exists; absence only surfaces to
    /// whoever fetches the URL.
    async fn presign_get(&self, object_id: &str, expires_in: Duration) -> MediaResult<String>;

    /// Delete one object. Deleting an already-absent object resolves however
    /// the store reports it.
    async fn delete(&self, object_id: &str) -> MediaResult<()>;
}
