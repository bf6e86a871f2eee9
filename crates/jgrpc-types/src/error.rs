use core::fmt;

/// The discriminator a caller observes inside `CallFailed` (`jg_rpc::CallFailed`).
///
/// Kept as a standalone, `Copy` enum so every layer (client, server, stub)
/// can tag an error without depending on each other's concrete error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallFailedKind {
    /// `ServiceNotFound` / `MethodNotFound` — surfaced by the server as a
    /// failed response rather than a connection error.
    NotFound,
    /// `InvocationFailed` — the implementation itself raised.
    Invocation,
    /// Client-side per-call timer expired.
    Timeout,
    /// Dial failed to complete within the connect timeout.
    Connect,
    /// Discovery returned an empty provider set; no I/O was attempted.
    NoProvider,
    /// The connection was closed (fatal frame, idle timeout, EOF) while the
    /// call was pending.
    ConnectionLost,
    /// The directory (ZooKeeper) operation itself failed.
    Directory,
}

impl fmt::Display for CallFailedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Invocation => "invocation",
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::NoProvider => "no_provider",
            Self::ConnectionLost => "connection_lost",
            Self::Directory => "directory",
        };
        f.write_str(label)
    }
}
