use bytes::Bytes;

use crate::record::{RequestRecord, ResponseRecord};
use crate::serializer::{CodecError, Serializer};

/// Tag 0 — the language's richest opaque object graph encoder, used for
/// max fidelity (spec.md §4.2). `bincode` is the idiomatic stand-in here:
/// compact, dependency-free of any schema language, and already the
/// conventional choice across the Rust ecosystem for this role.
pub const NATIVE_TAG: u8 = 0;

#[derive(Debug, Default)]
pub struct NativeSerializer;

impl Serializer for NativeSerializer {
    fn tag(&self) -> u8 {
        NATIVE_TAG
    }

    fn encode_request(&self, record: &RequestRecord) -> Result<Bytes, CodecError> {
        bincode::serialize(record).map(Bytes::from).map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn decode_request(&self, bytes: &[u8]) -> Result<RequestRecord, CodecError> {
        bincode::deserialize(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }

    fn encode_response(&self, record: &ResponseRecord) -> Result<Bytes, CodecError> {
        bincode::serialize(record).map(Bytes::from).map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<ResponseRecord, CodecError> {
        bincode::deserialize(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_request() {
        let serializer = NativeSerializer;
        let record = RequestRecord {
            interface: "demo.Hello".to_owned(),
            method: "hello".to_owned(),
            arguments: vec![serde_value::Value::String("world".to_owned())],
            argument_types: vec!["alloc::string::String".to_owned()],
            correlation_id: "1-1".to_owned(),
        };
        let bytes = serializer.encode_request(&record).unwrap();
        assert_eq!(serializer.decode_request(&bytes).unwrap(), record);
    }
}
