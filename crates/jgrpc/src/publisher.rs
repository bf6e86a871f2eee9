use core::time::Duration;
use std::net::IpAddr;
use std::sync::Arc;

use jgrpc_discovery::Directory;
use jgrpc_server::{DispatchEntry, Server, ServerConfig};
use jgrpc_types::Endpoint;

use crate::error::CallFailed;

/// How long `shutdown` waits after deregistering from the directory before
/// it tears the dispatcher down, giving in-flight client calls a window to
/// notice the provider is gone before it actually stops answering
/// (spec.md §4.8).
const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub server: ServerConfig,
    pub drain_interval: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self { server: ServerConfig::default(), drain_interval: DEFAULT_DRAIN_INTERVAL }
    }
}

/// Composes a [`Server`] with a [`Directory`]: `publish` registers an
/// implementation locally and then announces it so clients can discover
/// it; `shutdown` reverses the order, so no client is handed a provider
/// that is already gone.
pub struct ServerPublisher {
    server: Server,
    directory: Arc<dyn Directory>,
    endpoint: Endpoint,
    drain_interval: Duration,
}

impl ServerPublisher {
    /// Binds the server, resolving this process's own address from the
    /// first non-loopback interface (spec.md §4.8's "own-endpoint
    /// resolution") combined with whatever port `start()` ends up bound to.
    pub async fn bind(
        directory: Arc<dyn Directory>,
        config: PublisherConfig,
    ) -> Result<Self, CallFailed> {
        let server = Server::new(config.server);
        let local_addr = server
            .start()
            .await
            .map_err(|err| CallFailed::new(jgrpc_types::CallFailedKind::Connect, err.to_string()))?;

        let host = resolve_own_address()
            .map_err(|err| CallFailed::new(jgrpc_types::CallFailedKind::Connect, err.to_string()))?;
        let endpoint = Endpoint::new(host.to_string(), local_addr.port());

        Ok(Self { server, directory, endpoint, drain_interval: config.drain_interval })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Registers `entry` locally, then announces its interface at the
    /// directory under this publisher's resolved endpoint.
    pub async fn publish(&self, entry: Arc<dyn DispatchEntry>) -> Result<(), CallFailed> {
        let interface = entry.interface_name();
        self.server
            .services()
            .register(entry)
            .await
            .map_err(|err| CallFailed::new(jgrpc_types::CallFailedKind::Invocation, err.to_string()))?;
        self.directory.register(interface, &self.endpoint).await?;
        Ok(())
    }

    /// Unregisters this endpoint from the directory first (so new
    /// discoveries stop seeing it), waits out the drain interval so
    /// in-flight clients notice before the provider actually stops
    /// answering, then shuts the dispatcher down. Directory failures are
    /// logged, not propagated (spec.md §4.8 step 1) — the dispatcher still
    /// shuts down even if deregistration failed.
    pub async fn shutdown(&self) {
        if let Err(err) = self.directory.unregister_all(&self.endpoint).await {
            tracing::warn!(error = %err, endpoint = %self.endpoint, "failed to unregister from directory");
        }
        tracing::info!(drain = ?self.drain_interval, "draining before dispatcher shutdown");
        tokio::time::sleep(self.drain_interval).await;
        self.server.shutdown().await;
    }
}

fn resolve_own_address() -> std::io::Result<IpAddr> {
    let interfaces = if_addrs::get_if_addrs()?;
    interfaces
        .into_iter()
        .find(|iface| !iface.is_loopback())
        .map(|iface| iface.ip())
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no non-loopback network interface found")
        })
}
