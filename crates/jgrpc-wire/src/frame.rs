use bytes::Bytes;

/// `0xCAFEBABE`, big-endian. The decoder rejects any stream not starting
/// with this.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// The only wire version this crate speaks. Bumping this is the documented
/// escape hatch for a breaking change to the JSON type-descriptor shape
/// (see `jgrpc-codec`).
pub const VERSION: u8 = 1;

/// Header size: magic(4) + version(1) + serializer tag(1) + kind(1) +
/// body length(4).
pub const HEADER_LEN: usize = 11;

/// Bodies larger than this fail the frame with [`WireError::FrameTooLarge`].
pub const MAX_BODY_LEN: u32 = 16 * 1024 * 1024;

/// The fourth header byte. Heartbeats never carry user code; the handler
/// short-circuits on kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request = 1,
    Response = 2,
    HeartbeatRequest = 3,
    HeartbeatResponse = 4,
}

impl MessageKind {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Request),
            2 => Ok(Self::Response),
            3 => Ok(Self::HeartbeatRequest),
            4 => Ok(Self::HeartbeatResponse),
            other => Err(WireError::UnknownMessageKind(other)),
        }
    }
}

/// One decoded (or to-be-encoded) frame. The correlation id does not live
/// here — it rides inside the body as a field of the request/response
/// record, decoded by `jgrpc-codec` according to `serializer_tag`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub serializer_tag: u8,
    pub kind: MessageKind,
    pub body: Bytes,
}

impl Frame {
    #[must_use]
    pub fn new(serializer_tag: u8, kind: MessageKind, body: Bytes) -> Self {
        Self { serializer_tag, kind, body }
    }

    #[must_use]
    pub fn heartbeat_request(serializer_tag: u8) -> Self {
        Self::new(serializer_tag, MessageKind::HeartbeatRequest, Bytes::from_static(b"ping"))
    }

    #[must_use]
    pub fn heartbeat_response(serializer_tag: u8) -> Self {
        Self::new(serializer_tag, MessageKind::HeartbeatResponse, Bytes::from_static(b"pong"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("bad magic: expected {MAGIC:#010x}, got {0:#010x}")]
    InvalidMagic(u32),

    #[error("unsupported wire version: expected {VERSION}, got {0}")]
    InvalidVersion(u8),

    #[error("unknown message kind: {0}")]
    UnknownMessageKind(u8),

    #[error("body length {0} exceeds the {MAX_BODY_LEN} byte limit")]
    FrameTooLarge(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Whether this error is fatal to the connection it occurred on (true
    /// for every variant `FrameCodec` can produce — see spec.md §7).
    #[must_use]
    pub fn is_connection_fatal(&self) -> bool {
        true
    }
}
