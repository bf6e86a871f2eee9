use jgrpc_codec::ResponseRecord;
use scc::HashMap;
use tokio::sync::oneshot;

use crate::error::ClientError;

/// Calls awaiting a reply, keyed by correlation id. An entry is inserted
/// before its request frame is written (spec.md §4.6 step 4, invariant
/// P4), so a reply that arrives the instant after the write is never
/// missed.
#[derive(Default)]
pub struct PendingCalls {
    inner: HashMap<String, oneshot::Sender<Result<ResponseRecord, ClientError>>>,
}

impl PendingCalls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `correlation_id`, returning the receiver half the caller
    /// awaits.
    pub async fn register(
        &self,
        correlation_id: String,
    ) -> oneshot::Receiver<Result<ResponseRecord, ClientError>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.inner.insert_async(correlation_id, tx).await;
        rx
    }

    /// Removes and completes the call `response.correlation_id` names, if
    /// still pending (it may have already timed out and been dropped). A
    /// late or duplicate reply with no matching entry is logged and
    /// dropped (spec.md §4.6 "Reply protocol" step 3).
    pub async fn complete(&self, response: ResponseRecord) {
        let correlation_id = response.correlation_id.clone();
        if let Some((_, tx)) = self.inner.remove_async(&correlation_id).await {
            let _ = tx.send(Ok(response));
        } else {
            tracing::debug!(correlation_id, "reply for unknown or already-completed call");
        }
    }

    /// Removes a single pending entry without completing it — used when a
    /// call times out client-side and gives up waiting.
    pub async fn cancel(&self, correlation_id: &str) {
        let _ = self.inner.remove_async(correlation_id).await;
    }

    /// Fails every still-pending call on a connection that just died,
    /// per spec.md §7's propagation policy for a connection-fatal error.
    pub async fn fail_all(&self, make_error: impl Fn() -> ClientError) {
        let mut drained = Vec::new();
        self.inner.scan_async(|key, _value| drained.push(key.clone())).await;
        for correlation_id in drained {
            if let Some((_, tx)) = self.inner.remove_async(&correlation_id).await {
                let _ = tx.send(Err(make_error()));
            }
        }
    }
}
