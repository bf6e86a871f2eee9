//! The request/response data model (spec.md §3) and the pluggable body
//! [`Serializer`] registry keyed by the one-byte tag carried in the frame
//! header (spec.md §4.2).

#![forbid(unsafe_code)]

mod json;
mod native;
mod record;
mod registry;
mod serializer;

pub use json::{JsonSerializer, JSON_TAG};
pub use native::{NativeSerializer, NATIVE_TAG};
pub use record::{RequestRecord, ResponseRecord, Value};
pub use registry::{global, SerializerRegistry};
pub use serializer::{CodecError, Serializer};
