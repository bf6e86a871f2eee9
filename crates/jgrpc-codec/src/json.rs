use bytes::Bytes;

use crate::record::{RequestRecord, ResponseRecord};
use crate::serializer::{CodecError, Serializer};

/// Tag 1 — textual JSON, for debuggability and language independence
/// (spec.md §4.2). `RequestRecord::argument_types` is already plain
/// `Vec<String>`, so the "encode a type reference as its string name"
/// requirement holds for free: there is no separate type-reference
/// representation to special-case here, by construction.
pub const JSON_TAG: u8 = 1;

#[derive(Debug, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn tag(&self) -> u8 {
        JSON_TAG
    }

    fn encode_request(&self, record: &RequestRecord) -> Result<Bytes, CodecError> {
        serde_json::to_vec(record).map(Bytes::from).map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn decode_request(&self, bytes: &[u8]) -> Result<RequestRecord, CodecError> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }

    fn encode_response(&self, record: &ResponseRecord) -> Result<Bytes, CodecError> {
        serde_json::to_vec(record).map(Bytes::from).map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<ResponseRecord, CodecError> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_response() {
        let serializer = JsonSerializer;
        let record = ResponseRecord::ok(
            "1-1".to_owned(),
            Some(serde_value::Value::String("Hi, world".to_owned())),
        );
        let bytes = serializer.encode_response(&record).unwrap();
        assert_eq!(serializer.decode_response(&bytes).unwrap(), record);
    }

    #[test]
    fn is_human_readable_json() {
        let serializer = JsonSerializer;
        let record = RequestRecord {
            interface: "demo.Hello".to_owned(),
            method: "hello".to_owned(),
            arguments: vec![],
            argument_types: vec![],
            correlation_id: "1-1".to_owned(),
        };
        let bytes = serializer.encode_request(&record).unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("\"interface\":\"demo.Hello\""));
    }
}
