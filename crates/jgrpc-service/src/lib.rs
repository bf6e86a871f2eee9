//! `rpc_service!` — a declarative macro that, given one interface block,
//! emits the server-side interface trait, a `tower::Service`/
//! `DispatchEntry` dispatch adapter, and a typed client stub (spec.md
//! §4.7). This is the target-language substitute for the source system's
//! reflective proxy/dispatch machinery (design note §9).

#![forbid(unsafe_code)]

mod call_handle;
mod macros;

pub use call_handle::{spawn_call, CallHandle};
pub use jgrpc_client::{ClientConfig, ClientEngine, ClientError};
pub use jgrpc_codec::{RequestRecord, ResponseRecord};
pub use jgrpc_server::DispatchEntry;
pub use serde_value;
pub use tower;

/// Re-exported so macro-generated code can name `$crate::jgrpc_codec::*`
/// without the invoking crate needing its own `jgrpc-codec` dependency.
pub use jgrpc_codec;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jgrpc_balancer::RoundRobin;
    use jgrpc_discovery::{Directory, InMemoryDirectory};
    use jgrpc_server::{Server, ServerConfig};
    use jgrpc_types::Endpoint;

    use crate::{spawn_call, ClientConfig};

    crate::rpc_service! {
        service Hello {
            trait = HelloService;
            dispatch = HelloDispatch;
            client = HelloClient;
            interface = "demo.Hello";
            rpc greet(name: String) -> String;
            rpc add(a: i32, b: i32) -> i32;
            async rpc farewell(name: String) -> String;
        }
    }

    struct HelloImpl;

    impl HelloService for HelloImpl {
        fn greet<'a>(
            &'a self,
            name: String,
        ) -> core::pin::Pin<Box<dyn core::future::Future<Output = String> + Send + 'a>> {
            Box::pin(async move { format!("hello, {name}") })
        }

        fn add<'a>(
            &'a self,
            a: i32,
            b: i32,
        ) -> core::pin::Pin<Box<dyn core::future::Future<Output = i32> + Send + 'a>> {
            Box::pin(async move { a + b })
        }

        fn farewell<'a>(
            &'a self,
            name: String,
        ) -> core::pin::Pin<Box<dyn core::future::Future<Output = String> + Send + 'a>> {
            Box::pin(async move { format!("goodbye, {name}") })
        }
    }

    async fn start_server() -> (Server, std::net::SocketAddr) {
        let server = Server::new(ServerConfig::default());
        server
            .services()
            .register(Arc::new(HelloDispatch::new(Arc::new(HelloImpl))))
            .await
            .unwrap();
        let addr = server.start().await.unwrap();
        (server, addr)
    }

    #[tokio::test]
    async fn generated_client_calls_the_generated_dispatch_entry() {
        let (server, addr) = start_server().await;

        let directory = Arc::new(InMemoryDirectory::new());
        directory.register("demo.Hello", &Endpoint::new(addr.ip().to_string(), addr.port())).await.unwrap();
        let engine =
            Arc::new(ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default()));
        let client = HelloClient::new(engine);

        assert_eq!(client.greet("world".to_owned()).await.unwrap(), "hello, world");
        assert_eq!(client.add(2, 3).await.unwrap(), 5);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn spawn_call_resolves_on_a_separate_task() {
        let (server, addr) = start_server().await;

        let directory = Arc::new(InMemoryDirectory::new());
        directory.register("demo.Hello", &Endpoint::new(addr.ip().to_string(), addr.port())).await.unwrap();
        let engine =
            Arc::new(ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default()));
        let client = HelloClient::new(engine);

        let handle = spawn_call(async move { client.greet("async".to_owned()).await });
        assert_eq!(handle.await.unwrap(), "hello, async");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn async_rpc_method_returns_a_call_handle_directly() {
        let (server, addr) = start_server().await;

        let directory = Arc::new(InMemoryDirectory::new());
        directory.register("demo.Hello", &Endpoint::new(addr.ip().to_string(), addr.port())).await.unwrap();
        let engine =
            Arc::new(ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default()));
        let client = HelloClient::new(engine);

        // `farewell` was declared `async rpc`, so this call returns a
        // `CallHandle` without blocking the current task on the reply.
        let handle = client.farewell("world".to_owned());
        assert_eq!(handle.await.unwrap(), "goodbye, world");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn stub_equality_is_local_identity_not_rpc() {
        let (server, addr) = start_server().await;
        let directory = Arc::new(InMemoryDirectory::new());
        directory.register("demo.Hello", &Endpoint::new(addr.ip().to_string(), addr.port())).await.unwrap();
        let engine =
            Arc::new(ClientEngine::new(directory, Arc::new(RoundRobin::new()), ClientConfig::default()));

        let a = HelloClient::new(Arc::clone(&engine));
        let b = HelloClient::new(Arc::clone(&engine));
        let c = a.clone();
        assert_eq!(a, b);
        assert_eq!(a, c);

        server.shutdown().await;
    }
}
