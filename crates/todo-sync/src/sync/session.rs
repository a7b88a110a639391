//! Sync Session
//!
//! Drives one adapter for a whole view lifetime: publishes snapshots and
//! connection status, re-subscribes after a dropped channel, and releases the
//! subscription as soon as the view is torn down.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{select, Either};

use super::{ReconnectPolicy, SyncAdapter, SyncError, Teardown};
use crate::collection::RemoteCollection;
use crate::domain::Item;

/// Connection state shown by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Connecting,
    Live,
    Reconnecting { attempt: u32 },
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Full replacement for the rendered list
    Snapshot(Vec<Item>),
    Status(SyncStatus),
}

/// Why [`SyncSession::run`] returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    TornDown,
    /// Gave up; carries the last failure, if the channel did not just close
    Stopped(Option<SyncError>),
}

enum PumpEnd {
    TornDown,
    Dropped(Option<SyncError>),
}

pub struct SyncSession<C: RemoteCollection + ?Sized> {
    adapter: SyncAdapter<C>,
    policy: ReconnectPolicy,
    status: SyncStatus,
    attempt: u32,
}

impl<C: RemoteCollection + ?Sized> SyncSession<C> {
    pub fn new(adapter: SyncAdapter<C>, policy: ReconnectPolicy) -> Self {
        Self {
            adapter,
            policy,
            status: SyncStatus::Connecting,
            attempt: 0,
        }
    }

    /// Run until teardown or until reconnecting is pointless.
    ///
    /// `sleep` produces the backoff delay; the browser passes a timer, tests
    /// pass a ready future.
    pub async fn run<S, Sl, Fut>(mut self, mut teardown: Teardown, mut sink: S, sleep: Sl) -> SessionEnd
    where
        S: FnMut(SyncEvent),
        Sl: Fn(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        sink(SyncEvent::Status(SyncStatus::Connecting));

        loop {
            let failure = match self.adapter.activate() {
                Ok(_) => {
                    let end = self.pump(&mut teardown, &mut sink).await;
                    match end {
                        PumpEnd::TornDown => return self.tear_down(),
                        PumpEnd::Dropped(failure) => failure,
                    }
                }
                Err(err) => {
                    log::warn!("activation failed: {}", err);
                    Some(err)
                }
            };
            self.adapter.deactivate();

            if let Some(err) = failure.as_ref().filter(|err| !err.is_transient()) {
                log::error!("live sync stopped: {}", err);
                self.publish(&mut sink, SyncStatus::Stopped);
                return SessionEnd::Stopped(failure);
            }

            self.attempt += 1;
            let Some(delay) = self.policy.delay(self.attempt) else {
                log::error!("live sync stopped after {} attempts", self.attempt - 1);
                self.publish(&mut sink, SyncStatus::Stopped);
                return SessionEnd::Stopped(failure);
            };

            log::info!("reconnecting in {:?} (attempt {})", delay, self.attempt);
            self.publish(&mut sink, SyncStatus::Reconnecting { attempt: self.attempt });

            let wait = pin!(sleep(delay));
            if let Either::Right(_) = select(wait, &mut teardown).await {
                return self.tear_down();
            }
        }
    }

    /// Forward snapshots until the channel drops or the view goes away
    async fn pump<S: FnMut(SyncEvent)>(&mut self, teardown: &mut Teardown, sink: &mut S) -> PumpEnd {
        loop {
            {
                let next = pin!(self.adapter.next_snapshot());
                match select(next, &mut *teardown).await {
                    Either::Left((Some(Ok(_)), _)) => {}
                    Either::Left((Some(Err(err)), _)) => return PumpEnd::Dropped(Some(err)),
                    Either::Left((None, _)) => return PumpEnd::Dropped(None),
                    Either::Right(_) => return PumpEnd::TornDown,
                }
            }

            self.attempt = 0;
            self.publish(sink, SyncStatus::Live);
            sink(SyncEvent::Snapshot(self.adapter.items().to_vec()));
        }
    }

    fn publish<S: FnMut(SyncEvent)>(&mut self, sink: &mut S, status: SyncStatus) {
        if self.status != status {
            self.status = status;
            sink(SyncEvent::Status(status));
        }
    }

    fn tear_down(mut self) -> SessionEnd {
        log::info!("view torn down, ending live sync");
        self.adapter.deactivate();
        SessionEnd::TornDown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::future::ready;

    use crate::collection::{CollectionError, MemoryCollection};
    use crate::domain::NewItem;
    use crate::sync::teardown_pair;

    fn session(collection: &Rc<MemoryCollection>, policy: ReconnectPolicy) -> SyncSession<MemoryCollection> {
        SyncSession::new(SyncAdapter::new(collection.clone()), policy)
    }

    fn statuses(events: &[SyncEvent]) -> Vec<SyncStatus> {
        events
            .iter()
            .filter_map(|event| match event {
                SyncEvent::Status(status) => Some(*status),
                SyncEvent::Snapshot(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_publishes_snapshots_until_teardown() {
        let collection = Rc::new(MemoryCollection::new());
        let events = RefCell::new(Vec::new());
        let (handle, teardown) = teardown_pair();

        let run = session(&collection, ReconnectPolicy::default()).run(
            teardown,
            |event| events.borrow_mut().push(event),
            |_| ready(()),
        );
        let driver = async {
            collection.insert(NewItem { text: "a".into() }).await.unwrap();
            collection.insert(NewItem { text: "b".into() }).await.unwrap();
            handle.fire();
        };
        let (end, ()) = futures::join!(run, driver);

        assert_eq!(end, SessionEnd::TornDown);
        assert_eq!(collection.live_subscriptions(), 0);

        let events = events.into_inner();
        assert_eq!(statuses(&events), [SyncStatus::Connecting, SyncStatus::Live]);
        let Some(SyncEvent::Snapshot(last)) = events.last() else {
            panic!("expected a snapshot last");
        };
        let texts: Vec<_> = last.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["b", "a"]);
    }

    #[tokio::test]
    async fn test_reconnects_after_transient_drop() {
        let collection = Rc::new(MemoryCollection::new());
        let events = RefCell::new(Vec::new());
        let delays = RefCell::new(Vec::new());
        let (handle, teardown) = teardown_pair();

        let run = session(&collection, ReconnectPolicy::default()).run(
            teardown,
            |event| events.borrow_mut().push(event),
            |delay| {
                delays.borrow_mut().push(delay);
                ready(())
            },
        );
        let driver = async {
            collection.drop_subscriptions(Some(CollectionError::Unavailable("offline".into())));
            handle.fire();
        };
        let (end, ()) = futures::join!(run, driver);

        assert_eq!(end, SessionEnd::TornDown);
        assert_eq!(collection.live_subscriptions(), 0);
        assert_eq!(delays.into_inner(), [Duration::from_secs(1)]);
        assert_eq!(
            statuses(&events.into_inner()),
            [
                SyncStatus::Connecting,
                SyncStatus::Live,
                SyncStatus::Reconnecting { attempt: 1 },
                SyncStatus::Live,
            ]
        );
    }

    #[tokio::test]
    async fn test_permission_denied_stops() {
        let collection = Rc::new(MemoryCollection::new());
        let events = RefCell::new(Vec::new());
        let (_handle, teardown) = teardown_pair();

        let run = session(&collection, ReconnectPolicy::default()).run(
            teardown,
            |event| events.borrow_mut().push(event),
            |_| ready(()),
        );
        let driver = async {
            collection.drop_subscriptions(Some(CollectionError::PermissionDenied("rules".into())));
        };
        let (end, ()) = futures::join!(run, driver);

        assert!(matches!(
            end,
            SessionEnd::Stopped(Some(SyncError::Collection(CollectionError::PermissionDenied(_))))
        ));
        assert_eq!(statuses(&events.into_inner()).last(), Some(&SyncStatus::Stopped));
        assert_eq!(collection.live_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let collection = Rc::new(MemoryCollection::new());
        collection.reject_subscriptions(Some(CollectionError::Unavailable("offline".into())));
        let delays = RefCell::new(Vec::new());
        let (_handle, teardown) = teardown_pair();

        let policy = ReconnectPolicy { max_attempts: Some(2), ..Default::default() };
        let end = session(&collection, policy)
            .run(teardown, |_| {}, |delay| {
                delays.borrow_mut().push(delay);
                ready(())
            })
            .await;

        assert!(matches!(end, SessionEnd::Stopped(Some(_))));
        assert_eq!(delays.into_inner(), [Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_teardown_during_backoff() {
        let collection = Rc::new(MemoryCollection::new());
        collection.reject_subscriptions(Some(CollectionError::Unavailable("offline".into())));
        let (handle, teardown) = teardown_pair();
        handle.fire();

        let end = session(&collection, ReconnectPolicy::default())
            .run(teardown, |_| {}, |_| futures::future::pending())
            .await;

        assert_eq!(end, SessionEnd::TornDown);
    }
}
