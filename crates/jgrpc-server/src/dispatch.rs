use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;

use jgrpc_codec::{RequestRecord, ResponseRecord};
use tower::{Service, ServiceExt};

/// One registered implementation, resolved by interface name out of a
/// [`crate::ServiceMap`] and invoked once per incoming request.
///
/// Kept separate from `tower::Service` itself (which needs `&mut self` and
/// isn't object-safe the way we need) so the service map can hold a plain
/// `Arc<dyn DispatchEntry>` and call it concurrently from many connection
/// tasks at once.
pub trait DispatchEntry: Send + Sync {
    fn interface_name(&self) -> &'static str;

    fn dispatch<'a>(
        &'a self,
        request: RequestRecord,
    ) -> Pin<Box<dyn Future<Output = ResponseRecord> + Send + 'a>>;
}

/// Adapts any `tower::Service<RequestRecord, Response = ResponseRecord,
/// Error = Infallible> + Clone` into a [`DispatchEntry`] by cloning the
/// service and driving it with `ServiceExt::oneshot` per call — this is
/// exactly the shape `jgrpc-service`'s `rpc_service!` macro generates for
/// each registered implementation (spec.md §4.5, design note §9(a)).
pub struct ServiceDispatchEntry<S> {
    interface_name: &'static str,
    service: S,
}

impl<S> ServiceDispatchEntry<S> {
    pub fn new(interface_name: &'static str, service: S) -> Self {
        Self { interface_name, service }
    }
}

impl<S> DispatchEntry for ServiceDispatchEntry<S>
where
    S: Service<RequestRecord, Response = ResponseRecord, Error = Infallible>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send,
{
    fn interface_name(&self) -> &'static str {
        self.interface_name
    }

    fn dispatch<'a>(
        &'a self,
        request: RequestRecord,
    ) -> Pin<Box<dyn Future<Output = ResponseRecord> + Send + 'a>> {
        Box::pin(async move {
            match self.service.clone().oneshot(request).await {
                Ok(response) => response,
                Err(infallible) => match infallible {},
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use core::task::Poll;

    use tower::Service;

    use super::*;

    #[derive(Clone)]
    struct Echo;

    impl Service<RequestRecord> for Echo {
        type Response = ResponseRecord;
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut core::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: RequestRecord) -> Self::Future {
            Box::pin(async move { Ok(ResponseRecord::ok(request.correlation_id, None)) })
        }
    }

    #[test]
    fn a_freshly_constructed_service_is_immediately_ready() {
        let mut service = Echo;
        tokio_test::assert_ready_ok!(service.poll_ready(&mut core::task::Context::from_waker(
            futures::task::noop_waker_ref()
        )));
    }

    #[tokio::test]
    async fn dispatch_entry_adapts_a_plain_tower_service() {
        let entry = ServiceDispatchEntry::new("demo.Echo", Echo);
        let request = RequestRecord {
            interface: "demo.Echo".to_owned(),
            method: "ping".to_owned(),
            arguments: vec![],
            argument_types: vec![],
            correlation_id: "1-1".to_owned(),
        };
        let response = entry.dispatch(request).await;
        assert!(response.success);
        assert_eq!(entry.interface_name(), "demo.Echo");
    }
}
