//! The service directory adapter (spec.md §4.3): schema and operations
//! issued against the external hierarchical coordinator, plus an
//! in-memory fake for tests and demos that don't want a live coordinator.

#![forbid(unsafe_code)]

mod error;
mod in_memory;
mod zk;

use core::future::Future;
use core::pin::Pin;

pub use error::DirectoryError;
pub use in_memory::InMemoryDirectory;
use jgrpc_types::{Endpoint, ProviderSet};
pub use zk::{ZkDirectory, ZkDirectoryConfig};

/// Tree schema: `/<namespace>/<interface-name>/providers/<host>:<port>`.
/// Parent nodes are persistent; leaf provider nodes are session-scoped.
pub trait Directory: Send + Sync {
    fn register<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>>;

    fn unregister<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>>;

    fn unregister_all<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>>;

    fn discover_all<'a>(
        &'a self,
        interface: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderSet, DirectoryError>> + Send + 'a>>;

    fn discover<'a>(
        &'a self,
        interface: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Endpoint>, DirectoryError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.discover_all(interface).await?.into_iter().next()) })
    }
}

/// Default ZooKeeper chroot (spec.md §6).
pub const DEFAULT_NAMESPACE: &str = "/jg-rpc";
