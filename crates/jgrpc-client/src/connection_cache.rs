use std::sync::Arc;

use jgrpc_net::Connection;
use jgrpc_types::Endpoint;
use jgrpc_wire::MessageKind;
use scc::HashMap;

use crate::error::ClientError;
use crate::pending::PendingCalls;

/// Open connections keyed by `Endpoint::cache_key`, opened lazily and
/// shared across every caller that dials the same endpoint (spec.md §4.6).
#[derive(Default)]
pub struct ConnectionCache {
    inner: HashMap<String, Arc<Connection>>,
}

impl ConnectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached connection for `endpoint`, dialing and spawning
    /// its reply-reader task if this is the first call for that endpoint.
    ///
    /// Two callers racing to dial the same never-yet-cached endpoint may
    /// each open a connection; the later `insert_async` wins and the
    /// loser's reader task exits once its socket is dropped. Correctness
    /// doesn't depend on which wins — only on a caller always getting
    /// *some* live connection back.
    pub async fn get_or_dial(
        &self,
        endpoint: &Endpoint,
        pending: &Arc<PendingCalls>,
    ) -> Result<Arc<Connection>, ClientError> {
        let key = endpoint.cache_key();
        if let Some(entry) = self.inner.get_async(&key).await {
            return Ok(Arc::clone(entry.get()));
        }

        let stream = jgrpc_net::dial(&key).await?;
        let connection = Arc::new(Connection::new(stream, key.clone()));
        tokio::spawn(read_replies(Arc::clone(&connection), Arc::clone(pending)));
        let _ = self.inner.insert_async(key, Arc::clone(&connection)).await;
        Ok(connection)
    }

    /// Drops the cached connection for `endpoint`, if any, so the next
    /// call dials fresh (used after a connection-fatal error).
    pub async fn evict(&self, endpoint: &Endpoint) {
        let _ = self.inner.remove_async(&endpoint.cache_key()).await;
    }
}

async fn read_replies(connection: Arc<Connection>, pending: Arc<PendingCalls>) {
    loop {
        let frame = match connection.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!(peer = connection.peer(), "connection closed by peer");
                break;
            }
            Err(err) => {
                tracing::warn!(peer = connection.peer(), %err, "connection-fatal read error");
                break;
            }
        };

        if frame.kind == MessageKind::HeartbeatResponse {
            continue;
        }
        if frame.kind != MessageKind::Response {
            continue;
        }

        let serializer = match jgrpc_codec::global().get(frame.serializer_tag) {
            Ok(serializer) => serializer,
            Err(err) => {
                tracing::warn!(%err, "reply used an unregistered serializer tag");
                continue;
            }
        };
        match serializer.decode_response(&frame.body) {
            Ok(response) => pending.complete(response).await,
            Err(err) => tracing::warn!(%err, "failed to decode reply body"),
        }
    }

    pending.fail_all(|| ClientError::ConnectionLost).await;
}
