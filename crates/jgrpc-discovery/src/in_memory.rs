use core::future::Future;
use core::pin::Pin;
use std::collections::HashMap;

use jgrpc_types::{Endpoint, ProviderSet};
use tokio::sync::Mutex;

use crate::{Directory, DirectoryError};

/// A `tokio::sync::Mutex`-guarded fake directory. Used by this workspace's
/// integration tests and by `demos/hello` when run without a live
/// ZooKeeper — a test/demo convenience, not a production alternative to
/// [`crate::ZkDirectory`].
#[derive(Default)]
pub struct InMemoryDirectory {
    providers: Mutex<HashMap<String, Vec<Endpoint>>>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Directory for InMemoryDirectory {
    fn register<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let mut providers = self.providers.lock().await;
            let leaves = providers.entry(interface.to_owned()).or_default();
            if !leaves.contains(endpoint) {
                leaves.push(endpoint.clone());
            }
            Ok(())
        })
    }

    fn unregister<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let mut providers = self.providers.lock().await;
            if let Some(leaves) = providers.get_mut(interface) {
                leaves.retain(|e| e != endpoint);
            }
            Ok(())
        })
    }

    fn unregister_all<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let mut providers = self.providers.lock().await;
            for leaves in providers.values_mut() {
                leaves.retain(|e| e != endpoint);
            }
            Ok(())
        })
    }

    fn discover_all<'a>(
        &'a self,
        interface: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderSet, DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let providers = self.providers.lock().await;
            Ok(providers.get(interface).cloned().unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_discover() {
        let directory = InMemoryDirectory::new();
        let endpoint = Endpoint::new("127.0.0.1", 9000);
        directory.register("demo.Hello", &endpoint).await.unwrap();
        assert_eq!(directory.discover_all("demo.Hello").await.unwrap(), vec![endpoint]);
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let directory = InMemoryDirectory::new();
        let endpoint = Endpoint::new("127.0.0.1", 9000);
        directory.register("demo.Hello", &endpoint).await.unwrap();
        directory.register("demo.Hello", &endpoint).await.unwrap();
        assert_eq!(directory.discover_all("demo.Hello").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_interface_yields_empty_not_error() {
        let directory = InMemoryDirectory::new();
        assert_eq!(directory.discover_all("demo.NoSuchService").await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn unregister_all_removes_every_interface_for_endpoint() {
        let directory = InMemoryDirectory::new();
        let endpoint = Endpoint::new("127.0.0.1", 9000);
        let other = Endpoint::new("127.0.0.1", 9001);
        directory.register("demo.A", &endpoint).await.unwrap();
        directory.register("demo.B", &endpoint).await.unwrap();
        directory.register("demo.A", &other).await.unwrap();

        directory.unregister_all(&endpoint).await.unwrap();

        assert_eq!(directory.discover_all("demo.A").await.unwrap(), vec![other]);
        assert_eq!(directory.discover_all("demo.B").await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn unregister_missing_leaf_succeeds_silently() {
        let directory = InMemoryDirectory::new();
        let endpoint = Endpoint::new("127.0.0.1", 9000);
        directory.unregister("demo.Hello", &endpoint).await.unwrap();
    }
}
