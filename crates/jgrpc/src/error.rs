pub use jgrpc_types::CallFailedKind;

/// The single error type every public `jgrpc` call surface returns.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CallFailed {
    pub kind: CallFailedKind,
    pub message: String,
}

impl CallFailed {
    #[must_use]
    pub fn new(kind: CallFailedKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Wire-contract prefix the server attaches to a `ServiceNotFound` response
/// (`jgrpc-server/src/server.rs`); used here to recover the `NotFound`
/// discriminator from a server-reported call failure.
const SERVICE_NOT_FOUND_PREFIX: &str = "Service not found: ";

impl From<jgrpc_client::ClientError> for CallFailed {
    fn from(err: jgrpc_client::ClientError) -> Self {
        let kind = match &err {
            jgrpc_client::ClientError::Directory(_) => CallFailedKind::Directory,
            jgrpc_client::ClientError::NoProvider(_) => CallFailedKind::NoProvider,
            jgrpc_client::ClientError::Net(_) => CallFailedKind::Connect,
            jgrpc_client::ClientError::Codec(_) => CallFailedKind::Invocation,
            jgrpc_client::ClientError::Call(message) => {
                if message.starts_with(SERVICE_NOT_FOUND_PREFIX) {
                    CallFailedKind::NotFound
                } else {
                    CallFailedKind::Invocation
                }
            }
            jgrpc_client::ClientError::Timeout => CallFailedKind::Timeout,
            jgrpc_client::ClientError::ConnectionLost => CallFailedKind::ConnectionLost,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<jgrpc_discovery::DirectoryError> for CallFailed {
    fn from(err: jgrpc_discovery::DirectoryError) -> Self {
        Self::new(CallFailedKind::Directory, err.to_string())
    }
}
