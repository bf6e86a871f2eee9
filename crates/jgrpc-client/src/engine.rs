use core::time::Duration;
use std::sync::Arc;

use jgrpc_balancer::LoadBalancer;
use jgrpc_codec::{RequestRecord, ResponseRecord, Value};
use jgrpc_discovery::Directory;
use jgrpc_wire::{Frame, MessageKind};

use crate::connection_cache::ConnectionCache;
use crate::correlation::next_correlation_id;
use crate::error::ClientError;
use crate::pending::PendingCalls;

/// Client-side tuning (spec.md §4.6): the hard connect timeout lives in
/// `jgrpc-net`; this is the per-call reply timeout, configurable in the
/// 10s-30s range the spec calls for, default 10s.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub call_timeout: Duration,
    pub serializer_tag: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { call_timeout: Duration::from_secs(10), serializer_tag: jgrpc_codec::NATIVE_TAG }
    }
}

/// Resolves a backend for every call via `discovery` + `balancer` (no
/// provider-set caching in the core path, per design note §9's documented
/// Open Question), then routes the request over a cached connection.
pub struct ClientEngine {
    directory: Arc<dyn Directory>,
    balancer: Arc<dyn LoadBalancer>,
    connections: ConnectionCache,
    pending: Arc<PendingCalls>,
    config: ClientConfig,
}

impl ClientEngine {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, balancer: Arc<dyn LoadBalancer>, config: ClientConfig) -> Self {
        Self {
            directory,
            balancer,
            connections: ConnectionCache::new(),
            pending: Arc::new(PendingCalls::new()),
            config,
        }
    }

    /// Performs one RPC: discover providers for `interface`, pick one,
    /// route `arguments` to `method`, and wait for the matching reply.
    pub async fn call(
        &self,
        interface: &str,
        method: &str,
        arguments: Vec<Value>,
        argument_types: Vec<String>,
    ) -> Result<ResponseRecord, ClientError> {
        let providers = self.directory.discover_all(interface).await?;
        let endpoint = self
            .balancer
            .pick(&providers, interface)
            .ok_or_else(|| ClientError::NoProvider(interface.to_owned()))?;

        let connection = self.connections.get_or_dial(&endpoint, &self.pending).await?;

        let correlation_id = next_correlation_id();
        let request = RequestRecord {
            interface: interface.to_owned(),
            method: method.to_owned(),
            arguments,
            argument_types,
            correlation_id: correlation_id.clone(),
        };

        // Register before writing the frame (invariant P4): a reply that
        // arrives the instant after the write must never be missed.
        let reply_rx = self.pending.register(correlation_id.clone()).await;

        let serializer = jgrpc_codec::global().get(self.config.serializer_tag)?;
        let body = serializer.encode_request(&request)?;
        if let Err(err) = connection.send(Frame::new(self.config.serializer_tag, MessageKind::Request, body)).await
        {
            self.pending.cancel(&correlation_id).await;
            self.connections.evict(&endpoint).await;
            return Err(err.into());
        }

        match tokio::time::timeout(self.config.call_timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_canceled)) => Err(ClientError::ConnectionLost),
            Err(_elapsed) => {
                self.pending.cancel(&correlation_id).await;
                Err(ClientError::Timeout)
            }
        }
    }
}
