//! Remote Collection - Core Trait
//!
//! The seam between the to-do logic and the document database. The browser
//! build binds it to Firestore; tests and local mode use the in-memory
//! collection.

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use futures::stream::LocalBoxStream;

use super::{CollectionResult, Query};
use crate::domain::{Item, ItemId, NewItem};

/// Handle identifying one live subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stream of full result sets. It ends when the subscription is released or
/// the remote side drops it.
pub type SnapshotStream = LocalBoxStream<'static, CollectionResult<Vec<Item>>>;

/// A live query: its handle plus the snapshots it delivers
pub struct Subscription {
    pub id: SubscriptionId,
    pub snapshots: SnapshotStream,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

/// A remote, ordered collection of to-do records.
///
/// Futures are not `Send`: the browser binding holds JS handles and the whole
/// UI runs on one thread.
#[async_trait(?Send)]
pub trait RemoteCollection {
    /// Insert a record; the service assigns id and creation time
    async fn insert(&self, item: NewItem) -> CollectionResult<ItemId>;

    /// Partial update of the `completed` field
    async fn set_completed(&self, id: &ItemId, completed: bool) -> CollectionResult<()>;

    /// Hard delete
    async fn delete(&self, id: &ItemId) -> CollectionResult<()>;

    /// Open a live query. The first snapshot arrives as soon as the service
    /// has a result; every later change re-delivers the full set.
    fn subscribe(&self, query: &Query) -> CollectionResult<Subscription>;

    /// Release a live query. Its stream ends afterwards.
    fn unsubscribe(&self, id: SubscriptionId) -> CollectionResult<()>;
}

/// Shared handle used by the view, the adapter and the controller
pub type SharedCollection = Rc<dyn RemoteCollection>;
