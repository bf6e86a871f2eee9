use core::time::Duration;
use std::net::SocketAddr;

use socket2::{Domain, SockRef, Socket, TcpKeepalive, Type};
use tokio::net::{TcpListener, TcpStream};

use crate::connection::NetError;

/// Accept backlog for server listeners (spec.md §4.5, SPEC_FULL §5).
pub const LISTEN_BACKLOG: i32 = 128;

/// Hard connect timeout (spec.md §4.6).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Dials `addr`, enforcing [`CONNECT_TIMEOUT`] and tuning the socket the
/// same way an accepted server-side connection is tuned.
pub async fn dial(addr: &str) -> Result<TcpStream, NetError> {
    let connect = TcpStream::connect(addr);
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, connect).await.map_err(|_elapsed| {
        tracing::warn!(%addr, timeout = ?CONNECT_TIMEOUT, "connect timed out");
        NetError::ConnectTimedOut(addr.to_owned())
    })??;
    configure_stream(&stream)?;
    tracing::debug!(%addr, "dialed connection");
    Ok(stream)
}

/// Applies the connection tuning spec.md §4.5 calls for on both accepted
/// and dialed sockets: `TCP_NODELAY` and TCP keep-alive.
pub fn configure_stream(stream: &TcpStream) -> Result<(), NetError> {
    stream.set_nodelay(true)?;
    let socket = SockRef::from(stream);
    let keepalive = TcpKeepalive::new().with_time(Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;
    Ok(())
}

/// Binds `addr` through `socket2` so the accept backlog is actually set to
/// [`LISTEN_BACKLOG`] (the `std`/tokio `TcpListener::bind` path leaves the
/// platform default, which spec.md §4.5 doesn't allow).
pub fn bind_listener(addr: &str) -> Result<TcpListener, NetError> {
    let addr: SocketAddr = addr.parse().map_err(|_err| NetError::InvalidAddr(addr.to_owned()))?;
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
