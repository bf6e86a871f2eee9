use core::time::Duration;

use futures::{SinkExt, StreamExt};
use jgrpc_wire::{Frame, FrameCodec, WireError};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite};

/// The default idle-read timeout (spec.md §4.5): if no frame — including a
/// heartbeat — arrives within this window, the read side gives up and the
/// connection is torn down.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("connect to {0} timed out")]
    ConnectTimedOut(String),

    #[error("invalid bind address {0:?}")]
    InvalidAddr(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("no frame received within {0:?}")]
    IdleTimeout(Duration),
}

/// A framed TCP connection, split into an independently-lockable read half
/// and write half so a reader task and a writer task never contend with
/// each other, only with concurrent callers on the same side.
pub struct Connection {
    reader: Mutex<FramedRead<tokio::net::tcp::OwnedReadHalf, FrameCodec>>,
    writer: Mutex<FramedWrite<tokio::net::tcp::OwnedWriteHalf, FrameCodec>>,
    idle_timeout: Duration,
    peer: String,
}

impl Connection {
    #[must_use]
    pub fn new(stream: TcpStream, peer: impl Into<String>) -> Self {
        Self::with_idle_timeout(stream, peer, DEFAULT_IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_idle_timeout(
        stream: TcpStream,
        peer: impl Into<String>,
        idle_timeout: Duration,
    ) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: Mutex::new(FramedRead::new(read_half, FrameCodec::new())),
            writer: Mutex::new(FramedWrite::new(write_half, FrameCodec::new())),
            idle_timeout,
            peer: peer.into(),
        }
    }

    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes one frame, serializing access against other concurrent
    /// writers on this connection.
    pub async fn send(&self, frame: Frame) -> Result<(), NetError> {
        let mut writer = self.writer.lock().await;
        writer.send(frame).await?;
        Ok(())
    }

    /// Reads the next frame, racing the idle timeout. `Ok(None)` means the
    /// peer closed the stream cleanly; `Err(IdleTimeout)` means nothing
    /// arrived in time and the caller should treat the connection as dead.
    pub async fn recv(&self) -> Result<Option<Frame>, NetError> {
        let mut reader = self.reader.lock().await;
        match tokio::time::timeout(self.idle_timeout, reader.next()).await {
            Ok(Some(Ok(frame))) => Ok(Some(frame)),
            Ok(Some(Err(err))) => Err(err.into()),
            Ok(None) => Ok(None),
            Err(_elapsed) => {
                tracing::warn!(peer = %self.peer, timeout = ?self.idle_timeout, "connection idle timeout");
                Err(NetError::IdleTimeout(self.idle_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jgrpc_wire::MessageKind;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn round_trips_a_frame_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            let conn = Connection::new(stream, addr.to_string());
            conn.send(Frame::new(0, MessageKind::HeartbeatRequest, bytes::Bytes::from_static(b"ping")))
                .await
                .unwrap();
        });

        let (stream, peer) = listener.accept().await.unwrap();
        let conn = Connection::new(stream, peer.to_string());
        let frame = conn.recv().await.unwrap().unwrap();
        assert_eq!(frame.kind, MessageKind::HeartbeatRequest);

        client.await.unwrap();
    }

    #[tokio::test]
    async fn recv_times_out_when_peer_stays_silent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let _client = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(stream);
        });

        let (stream, peer) = listener.accept().await.unwrap();
        let conn = Connection::with_idle_timeout(stream, peer.to_string(), Duration::from_millis(50));
        assert!(matches!(conn.recv().await, Err(NetError::IdleTimeout(_))));
    }
}
