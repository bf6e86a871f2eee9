//! The 11-byte frame header, the [`Frame`] it describes, and the
//! length-prefixed [`FrameCodec`] that turns a byte stream into a sequence
//! of frames (and back).

#![forbid(unsafe_code)]

mod codec;
mod frame;

pub use codec::FrameCodec;
pub use frame::{Frame, MessageKind, WireError, HEADER_LEN, MAGIC, MAX_BODY_LEN, VERSION};
