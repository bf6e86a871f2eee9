use bytes::Bytes;

use crate::record::{RequestRecord, ResponseRecord};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serializer tag {0} is not registered")]
    UnknownSerializer(u8),

    #[error("failed to serialize body: {0}")]
    Encode(String),

    #[error("failed to deserialize body: {0}")]
    Decode(String),
}

/// The body codec capability set (spec.md §4.2): encode/decode a request or
/// response record, identified by a one-byte `tag`. Kept dyn-safe (no
/// generic methods) so the registry can store `Arc<dyn Serializer>` values.
pub trait Serializer: Send + Sync {
    fn tag(&self) -> u8;
    fn encode_request(&self, record: &RequestRecord) -> Result<Bytes, CodecError>;
    fn decode_request(&self, bytes: &[u8]) -> Result<RequestRecord, CodecError>;
    fn encode_response(&self, record: &ResponseRecord) -> Result<Bytes, CodecError>;
    fn decode_response(&self, bytes: &[u8]) -> Result<ResponseRecord, CodecError>;
}
