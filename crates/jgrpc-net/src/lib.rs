//! Connection plumbing shared by `jgrpc-server` and `jgrpc-client`: a framed
//! TCP stream, a dial helper, and the heartbeat frames both sides exchange.

#![forbid(unsafe_code)]

mod connection;
mod dial;

pub use connection::{Connection, NetError, DEFAULT_IDLE_TIMEOUT};
pub use dial::{bind_listener, configure_stream, dial, LISTEN_BACKLOG};

use jgrpc_wire::{Frame, MessageKind};

/// Builds the heartbeat request both server accept loops and client
/// keep-alive tasks may send; tag `0` since the "ping"/"pong" body is a
/// fixed literal, not something that needs a negotiated serializer.
#[must_use]
pub fn heartbeat_request() -> Frame {
    Frame::heartbeat_request(0)
}

/// Builds the matching heartbeat response.
#[must_use]
pub fn heartbeat_response() -> Frame {
    Frame::heartbeat_response(0)
}

/// True for the two heartbeat message kinds, used by both sides to answer
/// heartbeats inline without invoking user dispatch code (spec.md §4.5).
#[must_use]
pub fn is_heartbeat(kind: MessageKind) -> bool {
    matches!(kind, MessageKind::HeartbeatRequest | MessageKind::HeartbeatResponse)
}
