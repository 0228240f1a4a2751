//! Public gateway facade.

use std::{sync::Arc, time::Duration};

use opentelemetry::{metrics::Meter, KeyValue};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    batch::{self, BatchOutcome},
    config::MediaStorageConfig,
    error::MediaResult,
    metrics::{GatewayMetrics, Timer},
    s3::S3MediaStore,
    store::MediaStore,
    types::{new_object_id, MediaPayload, UploadResult},
};

/// Facade over the media store: single and batched create/get/delete.
///
/// Stateless between calls; the remote store is the system of record.
/// Batch methods take the caller's [`CancellationToken`] and run on a child
/// token, so a failure inside one batch never cancels the caller's scope.
#[derive(Clone)]
pub struct MediaGateway {
    store: Arc<dyn MediaStore>,
    config: MediaStorageConfig,
    metrics: GatewayMetrics,
    public_base: String,
}

impl MediaGateway {
    /// Connect to the store, ensure the bucket, and build the facade.
    ///
    /// Fails fatally on connectivity or policy errors; retries, if desired,
    /// belong to the process supervisor.
    pub async fn new(config: MediaStorageConfig, meter: &Meter) -> MediaResult<Self> {
        config.validate()?;
        let store = Arc::new(S3MediaStore::new(&config).await?);
        Ok(Self::with_store(store, config, meter))
    }

    /// Build the facade over an existing store implementation.
    pub fn with_store(
        store: Arc<dyn MediaStore>,
        config: MediaStorageConfig,
        meter: &Meter,
    ) -> Self {
        let public_base = format!("{}/", config.public_base_url.trim_end_matches('/'));
        Self {
            store,
            metrics: GatewayMetrics::new(meter),
            config,
            public_base,
        }
    }

    /// Upload one payload and return its display URL and object ID.
    pub async fn create_one(&self, payload: MediaPayload) -> MediaResult<UploadResult> {
        let labels = [KeyValue::new("op", "create")];
        let _timer = Timer::start(&self.metrics.operations, &labels);

        let result = upload_one(&self.store, payload, self.config.presign_ttl()).await;
        if result.is_err() {
            self.metrics.errors.add(1, &labels);
        }
        result
    }

    /// Upload a batch concurrently.
    ///
    /// Returns whatever uploaded before the first failure. Already-committed
    /// uploads are NOT rolled back when a later item fails; orphaned objects
    /// are reconciled outside this subsystem.
    pub async fn create_many(
        &self,
        payloads: Vec<MediaPayload>,
        cancel: &CancellationToken,
    ) -> BatchOutcome<UploadResult> {
        let labels = [KeyValue::new("op", "create_many")];
        let _timer = Timer::start(&self.metrics.operations, &labels);
        debug!(count = payloads.len(), "Uploading media batch");

        let store = self.store.clone();
        let ttl = self.config.presign_ttl();
        let outcome = batch::execute(
            payloads,
            self.config.max_concurrency,
            cancel,
            move |payload: MediaPayload| {
                let store = store.clone();
                async move { upload_one(&store, payload, ttl).await }
            },
        )
        .await;

        if !outcome.is_complete() {
            self.metrics.errors.add(1, &labels);
        }
        outcome
    }

    /// Resolve the public display URL for one object.
    ///
    /// Pure string templating on the configured base URL; never contacts the
    /// store and never fails for a well-formed ID. A URL for an absent object
    /// only 404s at fetch time.
    pub fn get_one(&self, object_id: &str) -> String {
        format!("{}{}", self.public_base, object_id)
    }

    /// Resolve display URLs for a batch of objects.
    ///
    /// Purely local, so unlike the networked batch operations this cannot
    /// partially fail. Output order matches input order.
    pub fn get_many(&self, object_ids: &[String]) -> Vec<String> {
        object_ids.iter().map(|id| self.get_one(id)).collect()
    }

    /// Delete one object.
    pub async fn delete_one(&self, object_id: &str) -> MediaResult<()> {
        let labels = [KeyValue::new("op", "delete")];
        let _timer = Timer::start(&self.metrics.operations, &labels);

        let result = self.store.delete(object_id).await;
        if result.is_err() {
            self.metrics.errors.add(1, &labels);
        }
        result
    }

    /// Delete a batch concurrently, returning the IDs actually deleted.
    ///
    /// On the first failure, deletes that have not started yet are skipped;
    /// deletes already in flight still complete.
    pub async fn delete_many(
        &self,
        object_ids: Vec<String>,
        cancel: &CancellationToken,
    ) -> BatchOutcome<String> {
        let labels = [KeyValue::new("op", "delete_many")];
        let _timer = Timer::start(&self.metrics.operations, &labels);
        debug!(count = object_ids.len(), "Deleting media batch");

        let store = self.store.clone();
        let outcome = batch::execute(
            object_ids,
            self.config.max_concurrency,
            cancel,
            move |object_id: String| {
                let store = store.clone();
                async move {
                    store.delete(&object_id).await?;
                    Ok(object_id)
                }
            },
        )
        .await;

        if !outcome.is_complete() {
            self.metrics.errors.add(1, &labels);
        }
        outcome
    }
}

/// One upload: generate the ID, put the object, resolve its display URL.
async fn upload_one(
    store: &Arc<dyn MediaStore>,
    payload: MediaPayload,
    presign_ttl: Duration,
) -> MediaResult<UploadResult> {
    let object_id = new_object_id();
    store.put(&object_id, payload).await?;
    let url = store.presign_get(&object_id, presign_ttl).await?;
    Ok(UploadResult { url, object_id })
}
