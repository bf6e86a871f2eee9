use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::{Frame, MessageKind, WireError, HEADER_LEN, MAGIC, MAX_BODY_LEN, VERSION};

/// Length-prefixed framing over a byte stream: waits until `11 + body_len`
/// bytes are buffered, then emits exactly one [`Frame`]; never emits a
/// partial one. A malformed header (bad magic, bad version, oversize body)
/// fails the whole decode, which callers treat as connection-fatal (spec.md
/// §7) — `FrameCodec` itself never tries to resynchronize mid-stream.
#[derive(Debug, Default)]
pub struct FrameCodec {
    _private: (),
}

impl FrameCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = WireError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, WireError> {
        if src.len() < HEADER_LEN {
            src.reserve(HEADER_LEN - src.len());
            return Ok(None);
        }

        let magic = u32::from_be_bytes(src[0..4].try_into().expect("4 bytes"));
        if magic != MAGIC {
            return Err(WireError::InvalidMagic(magic));
        }

        let version = src[4];
        if version != VERSION {
            return Err(WireError::InvalidVersion(version));
        }

        let serializer_tag = src[5];
        let kind = MessageKind::try_from(src[6])?;
        let body_len = u32::from_be_bytes(src[7..11].try_into().expect("4 bytes"));
        if body_len > MAX_BODY_LEN {
            return Err(WireError::FrameTooLarge(body_len));
        }

        let frame_len = HEADER_LEN + body_len as usize;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let mut frame_bytes = src.split_to(frame_len);
        frame_bytes.advance(HEADER_LEN);
        let body = frame_bytes.freeze();

        tracing::trace!(serializer_tag, kind = kind.as_u8(), body_len, "decoded frame");
        Ok(Some(Frame::new(serializer_tag, kind, body)))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = WireError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), WireError> {
        let body_len = u32::try_from(frame.body.len())
            .map_err(|_err| WireError::FrameTooLarge(u32::MAX))?;
        if body_len > MAX_BODY_LEN {
            return Err(WireError::FrameTooLarge(body_len));
        }

        dst.reserve(HEADER_LEN + frame.body.len());
        dst.put_u32(MAGIC);
        dst.put_u8(VERSION);
        dst.put_u8(frame.serializer_tag);
        dst.put_u8(frame.kind.as_u8());
        dst.put_u32(body_len);
        dst.put_slice(&frame.body);

        tracing::trace!(
            serializer_tag = frame.serializer_tag,
            kind = frame.kind.as_u8(),
            body_len,
            "encoded frame"
        );
        Ok(())
    }
}

/// Encode a single [`Frame`] to its on-the-wire bytes, for callers that
/// don't want to drive a full `Encoder`/`Decoder` pair (e.g. tests).
#[must_use]
pub fn encode_frame(frame: Frame) -> Bytes {
    let mut buf = BytesMut::new();
    FrameCodec::new()
        .encode(frame, &mut buf)
        .expect("in-memory encode cannot fail");
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use proptest::prelude::*;
    use test_strategy::proptest;
    use tokio_util::codec::{Decoder, Encoder};

    use super::*;
    use crate::frame::MessageKind;

    fn sample_frame(tag: u8, kind: MessageKind, body: Vec<u8>) -> Frame {
        Frame::new(tag, kind, Bytes::from(body))
    }

    #[test]
    fn round_trips_one_frame() {
        let mut codec = FrameCodec::new();
        let frame = sample_frame(1, MessageKind::Request, b"hello".to_vec());
        let mut buf = BytesMut::new();
        codec.encode(frame.clone(), &mut buf).unwrap();

        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.serializer_tag, frame.serializer_tag);
        assert_eq!(decoded.kind, frame.kind);
        assert_eq!(decoded.body, frame.body);
        assert!(buf.is_empty());
    }

    #[test]
    fn waits_for_a_full_frame() {
        let mut codec = FrameCodec::new();
        let frame = sample_frame(0, MessageKind::Response, b"0123456789".to_vec());
        let mut full = BytesMut::new();
        codec.encode(frame, &mut full).unwrap();

        // Feed byte by byte; only the last byte should produce Some(_).
        let mut partial = BytesMut::new();
        for (i, byte) in full.iter().enumerate() {
            partial.put_u8(*byte);
            let result = codec.decode(&mut partial).unwrap();
            if i + 1 < full.len() {
                assert!(result.is_none(), "decoded early at byte {i}");
            } else {
                assert!(result.is_some());
            }
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        buf.put_u32(0xDEAD_BEEF);
        buf.put_u8(VERSION);
        buf.put_u8(0);
        buf.put_u8(MessageKind::Request.as_u8());
        buf.put_u32(0);
        assert!(matches!(codec.decode(&mut buf), Err(WireError::InvalidMagic(_))));
    }

    #[test]
    fn rejects_bad_version() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        buf.put_u32(MAGIC);
        buf.put_u8(VERSION + 1);
        buf.put_u8(0);
        buf.put_u8(MessageKind::Request.as_u8());
        buf.put_u32(0);
        assert!(matches!(codec.decode(&mut buf), Err(WireError::InvalidVersion(_))));
    }

    #[test]
    fn rejects_oversize_body() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        buf.put_u32(MAGIC);
        buf.put_u8(VERSION);
        buf.put_u8(0);
        buf.put_u8(MessageKind::Request.as_u8());
        buf.put_u32(MAX_BODY_LEN + 1);
        assert!(matches!(codec.decode(&mut buf), Err(WireError::FrameTooLarge(_))));
    }

    #[proptest]
    fn round_trip_arbitrary_chunking(
        #[strategy(0u8..=1)] tag: u8,
        #[strategy(proptest::sample::select(vec![
            MessageKind::Request, MessageKind::Response,
            MessageKind::HeartbeatRequest, MessageKind::HeartbeatResponse,
        ]))]
        kind: MessageKind,
        #[strategy(proptest::collection::vec(any::<u8>(), 0..256))] body: Vec<u8>,
        #[strategy(1usize..7)] chunk_count: usize,
    ) {
        let mut encoder = FrameCodec::new();
        let frame = sample_frame(tag, kind, body.clone());
        let mut full = BytesMut::new();
        encoder.encode(frame, &mut full).unwrap();
        let full = full.freeze();

        let chunk_size = full.len().div_ceil(chunk_count).max(1);
        let mut decoder = FrameCodec::new();
        let mut buf = BytesMut::new();
        let mut decoded = None;
        for chunk in full.chunks(chunk_size) {
            buf.put_slice(chunk);
            if let Some(frame) = decoder.decode(&mut buf).unwrap() {
                prop_assert!(decoded.is_none(), "emitted more than one message");
                decoded = Some(frame);
            }
        }

        let decoded = decoded.expect("a full frame must eventually decode");
        prop_assert_eq!(decoded.serializer_tag, tag);
        prop_assert_eq!(decoded.kind, kind);
        prop_assert_eq!(decoded.body.as_ref(), body.as_slice());
    }
}
