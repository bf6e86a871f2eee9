use core::future::Future;
use core::pin::Pin;
use core::time::Duration;

use jgrpc_types::{Endpoint, ProviderSet};
use zookeeper_client as zk;

use crate::{Directory, DirectoryError, DEFAULT_NAMESPACE};

/// Construction parameters for [`ZkDirectory`].
#[derive(Debug, Clone)]
pub struct ZkDirectoryConfig {
    pub connect_string: String,
    pub namespace: String,
    pub session_timeout: Duration,
    pub connect_retries: u32,
    pub connect_backoff_floor: Duration,
}

impl ZkDirectoryConfig {
    #[must_use]
    pub fn new(connect_string: impl Into<String>) -> Self {
        Self {
            connect_string: connect_string.into(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            session_timeout: Duration::from_secs(10),
            connect_retries: 5,
            connect_backoff_floor: Duration::from_millis(200),
        }
    }
}

/// Directory backed by a live ZooKeeper session.
///
/// Parent nodes (`/<namespace>`, `/<namespace>/<interface>`,
/// `/<namespace>/<interface>/providers`) are created persistent and
/// on-demand; leaf nodes are created ephemeral, so a crashed provider's
/// registrations disappear with its session instead of requiring an
/// explicit unregister.
pub struct ZkDirectory {
    client: zk::Client,
    namespace: String,
}

impl ZkDirectory {
    /// Opens a session against `config.connect_string`, retrying with
    /// exponential backoff up to `config.connect_retries` times before
    /// giving up.
    pub async fn connect(config: ZkDirectoryConfig) -> Result<Self, DirectoryError> {
        let mut attempt = 0;
        let mut backoff = config.connect_backoff_floor;
        loop {
            let connector = zk::Client::connector().session_timeout(config.session_timeout);
            match connector.connect(&config.connect_string).await {
                Ok(client) => {
                    let directory = Self { client, namespace: config.namespace.clone() };
                    directory.ensure_persistent(&directory.namespace).await?;
                    return Ok(directory);
                }
                Err(err) if attempt < config.connect_retries => {
                    tracing::warn!(attempt, %err, "zookeeper connect failed, retrying");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff *= 2;
                }
                Err(err) => return Err(DirectoryError::SessionLost(err.to_string())),
            }
        }
    }

    /// Ends the ZooKeeper session, releasing every ephemeral node this
    /// client created.
    pub fn close(self) {
        drop(self.client);
    }

    fn providers_path(&self, interface: &str) -> String {
        format!("{}/{interface}/providers", self.namespace)
    }

    fn leaf_path(&self, interface: &str, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.providers_path(interface), endpoint.cache_key())
    }

    async fn ensure_persistent(&self, path: &str) -> Result<(), DirectoryError> {
        let mut built = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            built.push('/');
            built.push_str(segment);
            let options = zk::CreateMode::Persistent.with_acls(zk::Acls::anyone_all());
            match self.client.create(&built, b"", &options).await {
                Ok(_) | Err(zk::Error::NodeExists) => {}
                Err(err) => return Err(DirectoryError::Request(err.to_string())),
            }
        }
        Ok(())
    }
}

impl Directory for ZkDirectory {
    fn register<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            self.ensure_persistent(&self.providers_path(interface)).await?;
            let options = zk::CreateMode::Ephemeral.with_acls(zk::Acls::anyone_all());
            match self.client.create(&self.leaf_path(interface, endpoint), b"", &options).await {
                Ok(_) | Err(zk::Error::NodeExists) => Ok(()),
                Err(err) => Err(DirectoryError::Request(err.to_string())),
            }
        })
    }

    fn unregister<'a>(
        &'a self,
        interface: &'a str,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            match self.client.delete(&self.leaf_path(interface, endpoint), None).await {
                Ok(()) | Err(zk::Error::NoNode) => Ok(()),
                Err(err) => Err(DirectoryError::Request(err.to_string())),
            }
        })
    }

    fn unregister_all<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let interfaces = match self.client.list_children(&self.namespace).await {
                Ok(children) => children,
                Err(zk::Error::NoNode) => return Ok(()),
                Err(err) => return Err(DirectoryError::Request(err.to_string())),
            };
            for interface in interfaces {
                if let Err(err) = self.unregister(&interface, endpoint).await {
                    tracing::warn!(%interface, %endpoint, %err, "failed to unregister from interface, continuing");
                }
            }
            Ok(())
        })
    }

    fn discover_all<'a>(
        &'a self,
        interface: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderSet, DirectoryError>> + Send + 'a>> {
        Box::pin(async move {
            let leaves = match self.client.list_children(&self.providers_path(interface)).await {
                Ok(leaves) => leaves,
                Err(zk::Error::NoNode) => return Ok(Vec::new()),
                Err(err) => return Err(DirectoryError::Request(err.to_string())),
            };
            Ok(leaves
                .into_iter()
                .filter_map(|leaf| match leaf.parse() {
                    Ok(endpoint) => Some(endpoint),
                    Err(_) => {
                        tracing::warn!(leaf, "skipping malformed provider node");
                        None
                    }
                })
                .collect())
        })
    }
}
