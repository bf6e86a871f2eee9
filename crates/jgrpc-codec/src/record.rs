/// The codec-neutral representation of one argument or result value.
///
/// `serde_value::Value` is already a direct dependency of the teacher's
/// `harpc-client` crate for exactly this purpose: a serializer-agnostic
/// payload that can be re-serialized by whichever tag the wire says to use.
pub type Value = serde_value::Value;

/// spec.md §3 "Request record".
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestRecord {
    pub interface: String,
    pub method: String,
    pub arguments: Vec<Value>,
    /// Per-argument type tags, used by the server to disambiguate
    /// overloaded methods. Pinned to "fully-qualified type name as string"
    /// for every serializer (see `jgrpc-codec`'s crate docs and spec.md §9's
    /// Open Question) rather than left serializer-dependent.
    pub argument_types: Vec<String>,
    pub correlation_id: String,
}

/// spec.md §3 "Response record".
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResponseRecord {
    pub result: Option<Value>,
    pub error: String,
    pub success: bool,
    pub correlation_id: String,
}

impl ResponseRecord {
    #[must_use]
    pub fn ok(correlation_id: String, result: Option<Value>) -> Self {
        Self { result, error: String::new(), success: true, correlation_id }
    }

    #[must_use]
    pub fn failed(correlation_id: String, message: impl Into<String>) -> Self {
        Self { result: None, error: message.into(), success: false, correlation_id }
    }
}
