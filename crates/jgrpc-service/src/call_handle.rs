use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use tokio::sync::oneshot;

/// A future-like handle over a call already in flight on another task.
///
/// `rpc_service!`'s sync-path methods are plain `async fn`s, which already
/// give callers the usual choice of awaiting immediately or holding the
/// returned future for later. `async rpc` methods return a `CallHandle`
/// directly instead (spec.md §4.7's "declared return type is a future-like
/// handle" rule): the call is spawned immediately and the handle can be
/// collected from a different task entirely. [`spawn_call`] is what drives
/// both that generated path and any manual use: it polls the underlying
/// call to completion on its own tokio task, so awaiting the returned
/// handle never blocks an I/O worker, only the task doing the awaiting.
pub struct CallHandle<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T: Send + 'static> Future for CallHandle<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(_canceled)) => {
                panic!("CallHandle's spawned task was dropped before completing")
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Spawns `future` onto the current tokio runtime and returns a
/// [`CallHandle`] that resolves once it finishes.
pub fn spawn_call<F>(future: F) -> CallHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(future.await);
    });
    CallHandle { receiver: rx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_to_the_spawned_futures_output() {
        let handle = spawn_call(async { 1 + 1 });
        assert_eq!(handle.await, 2);
    }
}
