//! Concurrent batch execution with first-failure cancellation.

use std::{future::Future, sync::Arc};

use tokio::{
    sync::{mpsc, Semaphore},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::MediaError;

/// Outcome of one batch: everything that completed before the batch finished
/// or was cut short, plus the first error observed.
///
/// `completed` is authoritative for what actually happened in the store even
/// when `error` is set, and carries no ordering relative to the input.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub completed: Vec<T>,
    pub error: Option<MediaError>,
}

impl<T> BatchOutcome<T> {
    /// True when every item in the batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Run one store operation per item, with at most `max_concurrency` in
/// flight.
///
/// The first failing item cancels the rest of the batch: items that have not
/// started yet are skipped and produce no outcome at all, while calls already
/// in flight run to completion. Successes dequeued before the failure was
/// observed are returned alongside the error; successes landing after it are
/// left undrained. Cancelling `cancel` skips unstarted items the same way
/// without producing an error of its own.
pub(crate) async fn execute<T, R, F, Fut>(
    items: Vec<T>,
    max_concurrency: usize,
    cancel: &CancellationToken,
    op: F,
) -> BatchOutcome<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, MediaError>> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return BatchOutcome {
            completed: Vec::new(),
            error: None,
        };
    }

    // A failure inside the batch must cancel only its siblings, never the
    // caller's surrounding scope.
    let cancel = cancel.child_token();
    // Sized to the batch so no task ever blocks posting its outcome.
    let (done_tx, mut done_rx) = mpsc::channel::<R>(total);
    let (fail_tx, mut fail_rx) = mpsc::channel::<MediaError>(total);
    let slots = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let op = Arc::new(op);

    let mut tasks = JoinSet::new();
    for item in items {
        let done_tx = done_tx.clone();
        let fail_tx = fail_tx.clone();
        let cancel = cancel.clone();
        let slots = slots.clone();
        let op = op.clone();
        tasks.spawn(async move {
            let _permit = match slots.acquire().await {
                Ok(permit) => permit,
                Err(_) => return, // semaphore is never closed while tasks run
            };
            // Checked before the call only; an operation already in flight is
            // never interrupted.
            if cancel.is_cancelled() {
                return;
            }
            match (*op)(item).await {
                Ok(result) => {
                    let _ = done_tx.send(result).await;
                }
                Err(err) => {
                    cancel.cancel();
                    let _ = fail_tx.send(err).await;
                }
            }
        });
    }
    drop(done_tx);
    drop(fail_tx);

    // Drain both queues first-ready-wins until a failure surfaces or the
    // batch is exhausted.
    let mut completed = Vec::with_capacity(total);
    let mut error = None;
    let mut done_open = true;
    let mut fail_open = true;
    while error.is_none() && (done_open || fail_open) && completed.len() < total {
        tokio::select! {
            result = done_rx.recv(), if done_open => match result {
                Some(value) => completed.push(value),
                None => done_open = false,
            },
            failure = fail_rx.recv(), if fail_open => match failure {
                Some(err) => error = Some(err),
                None => fail_open = false,
            },
        }
    }

    // Let in-flight calls finish; skipped tasks return immediately.
    while tasks.join_next().await.is_some() {}

    debug!(
        total,
        completed = completed.len(),
        failed = error.is_some(),
        "Batch finished"
    );
    BatchOutcome { completed, error }
}
