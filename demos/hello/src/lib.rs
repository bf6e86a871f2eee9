//! `demo.Hello` — scenario S1: one interface, one method, exercised by a
//! server binary and a client binary that both build on `jgrpc`.

use core::future::Future;
use core::pin::Pin;
use core::time::Duration;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use jgrpc::prelude::*;
use tracing_subscriber::EnvFilter;

jgrpc_service::rpc_service! {
    service Hello {
        trait = HelloService;
        dispatch = HelloDispatch;
        client = HelloClient;
        interface = "demo.Hello";
        rpc greet(name: String) -> String;
    }
}

/// The one implementation this demo registers.
pub struct HelloImpl;

impl HelloService for HelloImpl {
    fn greet<'a>(
        &'a self,
        name: String,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(async move { format!("hello, {name}!") })
    }
}

/// Flattened into both binaries' `Args`, the way the teacher flattens
/// `hash_tracing::TracingConfig` into its own CLI args.
#[derive(Debug, Parser)]
pub struct TracingArgs {
    /// Filter string passed to `tracing_subscriber::EnvFilter`, e.g.
    /// `jgrpc=debug,hello_demo=trace`.
    #[clap(long, default_value = "info", env = "HELLO_DEMO_LOG")]
    pub log_filter: String,
}

impl TracingArgs {
    pub fn init(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&self.log_filter))
            .init();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectoryBackend {
    Memory,
    Zookeeper,
}

#[derive(Debug, Parser)]
pub struct DirectoryArgs {
    /// Which directory implementation to discover/announce through.
    #[clap(long, value_enum, default_value_t = DirectoryBackend::Memory, env = "HELLO_DEMO_DIRECTORY")]
    pub directory_backend: DirectoryBackend,

    /// ZooKeeper connect string, only used when `directory_backend = zookeeper`.
    #[clap(long, default_value = "127.0.0.1:2181", env = "HELLO_DEMO_ZK_CONNECT")]
    pub zk_connect: String,
}

impl DirectoryArgs {
    /// Builds the configured directory. The in-memory backend is process-
    /// local, so it only makes sense when the server and client binaries
    /// share a process (tests) — for the separate-binaries case this demo
    /// is normally run as, use `--directory-backend zookeeper`.
    pub async fn build(&self) -> Result<Arc<dyn Directory>, CallFailed> {
        match self.directory_backend {
            DirectoryBackend::Memory => Ok(Arc::new(InMemoryDirectory::new())),
            DirectoryBackend::Zookeeper => {
                let config = ZkDirectoryConfig::new(self.zk_connect.clone());
                let directory = ZkDirectory::connect(config)
                    .await
                    .map_err(|err| CallFailed::new(CallFailedKind::Directory, err.to_string()))?;
                Ok(Arc::new(directory))
            }
        }
    }
}

/// Shared between the server and client binaries: how long a client call
/// waits for a reply.
pub fn default_client_config() -> ClientConfig {
    ClientConfig { call_timeout: Duration::from_secs(10), ..ClientConfig::default() }
}
