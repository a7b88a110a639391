//! View teardown signal
//!
//! The view keeps the [`TeardownHandle`] and fires it from its cleanup hook;
//! the sync task awaits the paired [`Teardown`]. Dropping the handle without
//! firing counts as teardown too.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::FutureExt;

/// Create a connected handle and signal
pub fn teardown_pair() -> (TeardownHandle, Teardown) {
    let (sender, receiver) = oneshot::channel();
    (TeardownHandle(sender), Teardown { receiver, fired: false })
}

#[derive(Debug)]
pub struct TeardownHandle(oneshot::Sender<()>);

impl TeardownHandle {
    pub fn fire(self) {
        let _ = self.0.send(());
    }
}

/// Resolves once the view is gone. Can be polled again after resolving.
#[derive(Debug)]
pub struct Teardown {
    receiver: oneshot::Receiver<()>,
    fired: bool,
}

impl Future for Teardown {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.fired {
            return Poll::Ready(());
        }
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(_) => {
                self.fired = true;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire() {
        let (handle, mut teardown) = teardown_pair();
        assert!((&mut teardown).now_or_never().is_none());
        handle.fire();
        assert!((&mut teardown).now_or_never().is_some());
        assert!((&mut teardown).now_or_never().is_some());
    }

    #[test]
    fn test_dropped_handle_counts_as_teardown() {
        let (handle, mut teardown) = teardown_pair();
        drop(handle);
        assert!((&mut teardown).now_or_never().is_some());
    }

    #[tokio::test]
    async fn test_resolves_repeatedly() {
        let (handle, mut teardown) = teardown_pair();
        handle.fire();
        (&mut teardown).await;
        (&mut teardown).await;
    }
}
