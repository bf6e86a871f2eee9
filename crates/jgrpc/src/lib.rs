//! Facade crate (spec.md §4.8): `ServerPublisher` composes `jgrpc-server`
//! with `jgrpc-discovery` into `publish`/`shutdown`; `prelude` re-exports
//! the pieces a binary normally needs to stand up a service or a client.

#![forbid(unsafe_code)]

mod error;
mod publisher;

pub use error::CallFailed;
pub use publisher::{PublisherConfig, ServerPublisher};

pub mod prelude {
    pub use jgrpc_balancer::{ConsistentHash, LoadBalancer, Random, RoundRobin};
    pub use jgrpc_client::{ClientConfig, ClientEngine, ClientError};
    pub use jgrpc_discovery::{Directory, DirectoryError, InMemoryDirectory, ZkDirectory, ZkDirectoryConfig};
    pub use jgrpc_server::{DispatchEntry, Server, ServerConfig};
    pub use jgrpc_service::{rpc_service, spawn_call, CallHandle};
    pub use jgrpc_types::{CallFailedKind, Endpoint};

    pub use crate::{CallFailed, PublisherConfig, ServerPublisher};
}
