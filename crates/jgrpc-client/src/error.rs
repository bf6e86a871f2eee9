#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Directory(#[from] jgrpc_discovery::DirectoryError),

    #[error("no provider registered for interface {0}")]
    NoProvider(String),

    #[error(transparent)]
    Net(#[from] jgrpc_net::NetError),

    #[error(transparent)]
    Codec(#[from] jgrpc_codec::CodecError),

    /// A response that decoded fine but carried `success: false` — the
    /// server rejected the call (`ServiceNotFound`/`MethodNotFound`) or the
    /// implementation raised (`InvocationFailed`). Kept distinct from
    /// `Codec` so the facade doesn't conflate a genuine decode failure with
    /// a server-reported fault.
    #[error("{0}")]
    Call(String),

    #[error("call timed out waiting for a reply")]
    Timeout,

    #[error("connection lost before a reply arrived")]
    ConnectionLost,
}
