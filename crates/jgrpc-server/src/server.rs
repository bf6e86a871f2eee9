use core::time::Duration;
use std::net::SocketAddr;
use std::sync::Arc;

use jgrpc_net::Connection;
use jgrpc_wire::{Frame, MessageKind};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::ServerError;
use crate::service_map::ServiceMap;

/// Server-side tuning (spec.md §4.5): all defaults match the wire module's
/// compiled-in defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub idle_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_owned(),
            idle_timeout: jgrpc_net::DEFAULT_IDLE_TIMEOUT,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Owns the accept loop and the table of registered implementations.
/// `start()` binds and spawns the accept loop in the background;
/// `shutdown()` stops accepting, gives outstanding connections a grace
/// period, then returns (spec.md §4.8).
pub struct Server {
    services: Arc<ServiceMap>,
    config: ServerConfig,
    cancellation: CancellationToken,
}

impl Server {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { services: Arc::new(ServiceMap::new()), config, cancellation: CancellationToken::new() }
    }

    #[must_use]
    pub fn services(&self) -> &Arc<ServiceMap> {
        &self.services
    }

    /// Binds `config.bind_addr` and spawns the accept loop. Returns the
    /// address actually bound (useful when `bind_addr` asks for an
    /// ephemeral port).
    pub async fn start(&self) -> Result<SocketAddr, ServerError> {
        let listener = jgrpc_net::bind_listener(&self.config.bind_addr)?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        let services = Arc::clone(&self.services);
        let cancellation = self.cancellation.clone();
        let idle_timeout = self.config.idle_timeout;
        tokio::spawn(accept_loop(listener, services, cancellation, idle_timeout));
        Ok(local_addr)
    }

    /// Stops accepting new connections immediately, then waits out the
    /// configured grace period before returning so in-flight requests have
    /// a bounded window to finish.
    pub async fn shutdown(&self) {
        tracing::info!(grace = ?self.config.shutdown_grace, "server shutting down");
        self.cancellation.cancel();
        tokio::time::sleep(self.config.shutdown_grace).await;
    }
}

async fn accept_loop(
    listener: TcpListener,
    services: Arc<ServiceMap>,
    cancellation: CancellationToken,
    idle_timeout: Duration,
) {
    loop {
        tokio::select! {
            () = cancellation.cancelled() => {
                tracing::debug!("accept loop stopped");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        if let Err(err) = jgrpc_net::configure_stream(&stream) {
                            tracing::warn!(%peer, %err, "failed to tune accepted socket");
                        }
                        let connection =
                            Arc::new(Connection::with_idle_timeout(stream, peer.to_string(), idle_timeout));
                        tokio::spawn(serve_connection(connection, Arc::clone(&services), cancellation.clone()));
                    }
                    Err(err) => tracing::warn!(%err, "accept failed"),
                }
            }
        }
    }
}

async fn serve_connection(
    connection: Arc<Connection>,
    services: Arc<ServiceMap>,
    cancellation: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            () = cancellation.cancelled() => break,
            frame = connection.recv() => frame,
        };

        let frame = match frame {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(peer = connection.peer(), %err, "connection-fatal read error");
                break;
            }
        };

        if jgrpc_net::is_heartbeat(frame.kind) {
            if frame.kind == MessageKind::HeartbeatRequest {
                if let Err(err) = connection.send(jgrpc_net::heartbeat_response()).await {
                    tracing::warn!(peer = connection.peer(), %err, "failed to answer heartbeat");
                }
            }
            continue;
        }

        let services = Arc::clone(&services);
        let connection = Arc::clone(&connection);
        tokio::spawn(async move {
            if let Err(err) = handle_request(&connection, &services, frame).await {
                tracing::warn!(peer = connection.peer(), %err, "failed to handle request");
            }
        });
    }
}

async fn handle_request(
    connection: &Connection,
    services: &ServiceMap,
    frame: Frame,
) -> Result<(), ServerError> {
    let serializer = jgrpc_codec::global().get(frame.serializer_tag)?;
    let request = serializer.decode_request(&frame.body)?;
    let correlation_id = request.correlation_id.clone();
    let interface = request.interface.clone();

    let response = match services.resolve(&interface).await {
        Some(entry) => entry.dispatch(request).await,
        None => {
            jgrpc_codec::ResponseRecord::failed(correlation_id, format!("Service not found: {interface}"))
        }
    };

    let body = serializer.encode_response(&response)?;
    connection.send(Frame::new(frame.serializer_tag, MessageKind::Response, body)).await?;
    Ok(())
}
