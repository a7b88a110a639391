//! In-memory collection
//!
//! Behaves like the remote service as far as the to-do logic can observe:
//! server-assigned ids and timestamps, full snapshots pushed to every live
//! query after each write. Used by tests and by the page's local mode.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::StreamExt;

use super::{CollectionError, CollectionResult, Query, RemoteCollection, Subscription, SubscriptionId};
use crate::domain::{Item, ItemId, NewItem, Timestamp};

struct Listener {
    query: Query,
    sender: UnboundedSender<CollectionResult<Vec<Item>>>,
}

#[derive(Default)]
struct MemoryState {
    docs: HashMap<ItemId, Item>,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_doc: u64,
    next_subscription: u64,
    last_millis: i64,
    write_calls: u64,
    fail_next_write: Option<CollectionError>,
    reject_subscriptions: Option<CollectionError>,
}

impl MemoryState {
    /// Wall-clock millis, forced strictly increasing so creation order is total
    fn server_time(&mut self) -> Timestamp {
        let now = Utc::now().timestamp_millis().max(self.last_millis + 1);
        self.last_millis = now;
        Timestamp::from_millis(now)
    }

    fn snapshot(&self, query: &Query) -> Vec<Item> {
        let mut items: Vec<Item> = self.docs.values().cloned().collect();
        query.sort(&mut items);
        items
    }

    fn broadcast(&self) {
        for (id, listener) in &self.listeners {
            let snapshot = self.snapshot(&listener.query);
            if listener.sender.unbounded_send(Ok(snapshot)).is_err() {
                log::debug!("listener {} has no receiver", id);
            }
        }
    }

    fn begin_write(&mut self) -> CollectionResult<()> {
        self.write_calls += 1;
        match self.fail_next_write.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Single in-process collection of to-do records
#[derive(Default)]
pub struct MemoryCollection {
    state: RefCell<MemoryState>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, newest first
    pub fn items(&self) -> Vec<Item> {
        self.state.borrow().snapshot(&Query::newest_first())
    }

    pub fn len(&self) -> usize {
        self.state.borrow().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of write calls received, including rejected ones
    pub fn write_calls(&self) -> u64 {
        self.state.borrow().write_calls
    }

    /// Subscriptions opened and not yet released
    pub fn live_subscriptions(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Reject the next write with `err`
    pub fn fail_next_write(&self, err: CollectionError) {
        self.state.borrow_mut().fail_next_write = Some(err);
    }

    /// While set, every `subscribe` fails with `err`
    pub fn reject_subscriptions(&self, err: Option<CollectionError>) {
        self.state.borrow_mut().reject_subscriptions = err;
    }

    /// Drop every live subscription from the service side, optionally
    /// delivering `err` first. Mirrors a lost connection.
    pub fn drop_subscriptions(&self, err: Option<CollectionError>) {
        let listeners = std::mem::take(&mut self.state.borrow_mut().listeners);
        for (id, listener) in listeners {
            log::debug!("dropping subscription {}", id);
            if let Some(err) = &err {
                let _ = listener.sender.unbounded_send(Err(err.clone()));
            }
        }
    }
}

#[async_trait(?Send)]
impl RemoteCollection for MemoryCollection {
    async fn insert(&self, item: NewItem) -> CollectionResult<ItemId> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;

        state.next_doc += 1;
        let id = ItemId::new(format!("item-{:06}", state.next_doc));
        let created_at = state.server_time();
        state.docs.insert(
            id.clone(),
            Item { id: id.clone(), text: item.text, completed: false, created_at: Some(created_at) },
        );
        state.broadcast();
        Ok(id)
    }

    async fn set_completed(&self, id: &ItemId, completed: bool) -> CollectionResult<()> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;

        let doc = state
            .docs
            .get_mut(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        doc.completed = completed;
        state.broadcast();
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> CollectionResult<()> {
        let mut state = self.state.borrow_mut();
        state.begin_write()?;

        // Deleting a missing document succeeds, as it does remotely
        if state.docs.remove(id).is_some() {
            state.broadcast();
        }
        Ok(())
    }

    fn subscribe(&self, query: &Query) -> CollectionResult<Subscription> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = &state.reject_subscriptions {
            return Err(err.clone());
        }
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);

        let (sender, receiver) = mpsc::unbounded();
        let _ = sender.unbounded_send(Ok(state.snapshot(query)));
        state.listeners.insert(id, Listener { query: *query, sender });

        Ok(Subscription { id, snapshots: receiver.boxed_local() })
    }

    fn unsubscribe(&self, id: SubscriptionId) -> CollectionResult<()> {
        self.state
            .borrow_mut()
            .listeners
            .remove(&id)
            .map(|_| ())
            .ok_or(CollectionError::UnknownSubscription(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_and_time() {
        let collection = MemoryCollection::new();
        let id = collection.insert(NewItem { text: "Buy milk".into() }).await.unwrap();

        let items = collection.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert!(!items[0].completed);
        assert!(items[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase() {
        let collection = MemoryCollection::new();
        for n in 0..5 {
            collection.insert(NewItem { text: format!("item {}", n) }).await.unwrap();
        }
        let items = collection.items();
        assert_eq!(items[0].text, "item 4");
        assert!(crate::domain::is_newest_first(&items));
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_and_updates() {
        let collection = MemoryCollection::new();
        let mut sub = collection.subscribe(&Query::newest_first()).unwrap();

        assert_eq!(sub.snapshots.next().await, Some(Ok(vec![])));

        collection.insert(NewItem { text: "a".into() }).await.unwrap();
        let snapshot = sub.snapshots.next().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_ends_stream() {
        let collection = MemoryCollection::new();
        let mut sub = collection.subscribe(&Query::newest_first()).unwrap();
        assert_eq!(collection.live_subscriptions(), 1);

        collection.unsubscribe(sub.id).unwrap();
        assert_eq!(collection.live_subscriptions(), 0);

        let _initial = sub.snapshots.next().await;
        assert!(sub.snapshots.next().await.is_none());
        assert_eq!(
            collection.unsubscribe(sub.id),
            Err(CollectionError::UnknownSubscription(sub.id.0))
        );
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let collection = MemoryCollection::new();
        let result = collection.set_completed(&ItemId::new("nope"), true).await;
        assert!(matches!(result, Err(CollectionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_write_changes_nothing() {
        let collection = MemoryCollection::new();
        collection.fail_next_write(CollectionError::Unavailable("offline".into()));

        let result = collection.insert(NewItem { text: "lost".into() }).await;
        assert!(result.is_err());
        assert!(collection.is_empty());
        assert_eq!(collection.write_calls(), 1);

        collection.insert(NewItem { text: "kept".into() }).await.unwrap();
        assert_eq!(collection.len(), 1);
    }
}
