//! Client call engine (spec.md §4.6): pending-call tracking, a connection
//! cache, and `ClientEngine::call`, which performs discovery + load
//! balancing on every call.

#![forbid(unsafe_code)]

mod connection_cache;
mod correlation;
mod engine;
mod error;
mod pending;

pub use connection_cache::ConnectionCache;
pub use correlation::next_correlation_id;
pub use engine::{ClientConfig, ClientEngine};
pub use error::ClientError;
pub use pending::PendingCalls;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jgrpc_balancer::RoundRobin;
    use jgrpc_codec::{RequestRecord, ResponseRecord};
    use jgrpc_discovery::{Directory, InMemoryDirectory};
    use jgrpc_server::{DispatchEntry, Server, ServerConfig};
    use jgrpc_types::Endpoint;

    use super::*;

    struct Echo;

    impl DispatchEntry for Echo {
        fn interface_name(&self) -> &'static str {
            "demo.Echo"
        }

        fn dispatch<'a>(
            &'a self,
            request: RequestRecord,
        ) -> core::pin::Pin<Box<dyn core::future::Future<Output = ResponseRecord> + Send + 'a>> {
            Box::pin(async move {
                ResponseRecord::ok(request.correlation_id, request.arguments.into_iter().next())
            })
        }
    }

    #[tokio::test]
    async fn calls_a_registered_server_end_to_end() {
        let server = Server::new(ServerConfig::default());
        server.services().register(Arc::new(Echo)).await.unwrap();
        let addr = server.start().await.unwrap();

        let directory = Arc::new(InMemoryDirectory::new());
        let endpoint = Endpoint::new(addr.ip().to_string(), addr.port());
        directory.register("demo.Echo", &endpoint).await.unwrap();

        let engine = ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default());
        let response = engine.call("demo.Echo", "ping", vec![], vec![]).await.unwrap();
        assert!(response.success);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn missing_provider_fails_fast() {
        let directory = Arc::new(InMemoryDirectory::new());
        let engine = ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default());
        let err = engine.call("demo.NoSuchService", "ping", vec![], vec![]).await.unwrap_err();
        assert!(matches!(err, ClientError::NoProvider(_)));
    }
}
